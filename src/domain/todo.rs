use crate::domain::not_blank;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use chrono::{DateTime, Utc};
use derive_more::Display;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Todo {
    pub uid: Uuid,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Display, Validate)]
#[display("{text}")]
#[cfg_attr(test, derive(Clone))]
pub struct NewTodo {
    #[validate(custom = "not_blank")]
    pub text: String,
}

/// Partial update for a todo. Only the fields which are present get applied.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoUpdate {
    pub text: Option<String>,
    pub done: Option<bool>,
}

impl TodoUpdate {
    /// Trims the new text and drops it entirely if nothing is left, so an update can never
    /// blank out a todo
    fn without_blank_text(self) -> TodoUpdate {
        TodoUpdate {
            text: self
                .text
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
            done: self.done,
        }
    }
}

pub mod driven_ports {
    use super::*;

    pub trait TodoReader {
        /// All todos, newest first
        async fn all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error>;
    }

    pub trait TodoWriter {
        /// Stores a fully-formed todo and returns it as it was persisted
        async fn insert(
            &self,
            todo: &Todo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, anyhow::Error>;

        /// Returns true if exactly one todo was removed
        async fn delete(
            &self,
            uid: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        async fn update(
            &self,
            uid: Uuid,
            update: &TodoUpdate,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;
    use validator::ValidationErrors;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("the submitted todo was invalid: {0}")]
        Invalid(#[from] ValidationErrors),
        #[error("the requested todo does not exist")]
        NotFound,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TodoPort {
        async fn list(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<Todo>, TodoError>;
        async fn create(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;
        async fn delete(
            &self,
            uid: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<bool, TodoError>;
        async fn update(
            &self,
            uid: Uuid,
            update: TodoUpdate,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn list(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<Todo>, TodoError> {
        let todos = todo_read
            .all(&mut *ext_cxn)
            .await
            .context("listing todos")?;

        Ok(todos)
    }

    async fn create(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, TodoError> {
        new_todo.validate()?;

        let todo = Todo {
            uid: Uuid::new_v4(),
            created_at: Utc::now(),
            text: new_todo.text.trim().to_owned(),
            done: false,
        };
        let inserted = todo_write
            .insert(&todo, &mut *ext_cxn)
            .await
            .context("inserting a new todo")?;

        Ok(inserted)
    }

    async fn delete(
        &self,
        uid: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<bool, TodoError> {
        let removed = todo_write
            .delete(uid, &mut *ext_cxn)
            .await
            .context("deleting a todo")?;

        Ok(removed)
    }

    async fn update(
        &self,
        uid: Uuid,
        update: TodoUpdate,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, TodoError> {
        let update = update.without_blank_text();

        // Every failure is reported as "not found" so callers see a single outcome
        match todo_write.update(uid, &update, &mut *ext_cxn).await {
            Ok(Some(todo)) => Ok(todo),
            Ok(None) => Err(TodoError::NotFound),
            Err(port_err) => {
                warn!("Update of todo {uid} failed, reporting it as not found: {port_err:#}");
                Err(TodoError::NotFound)
            }
        }
    }
}
