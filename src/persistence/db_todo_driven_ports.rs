use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::{Todo, TodoUpdate};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, query, query_as};
use uuid::Uuid;

/// Stores todos in the PostgreSQL "todo" table
pub struct DbTodoPersistence;

#[derive(FromRow)]
struct TodoRow {
    uid: Uuid,
    created_at: DateTime<Utc>,
    text: String,
    done: bool,
}

impl From<TodoRow> for Todo {
    fn from(value: TodoRow) -> Self {
        Todo {
            uid: value.uid,
            created_at: value.created_at,
            text: value.text,
            done: value.done,
        }
    }
}

impl TodoReader for DbTodoPersistence {
    async fn all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<Todo> = query_as::<_, TodoRow>(
            "SELECT t.uid, t.created_at, t.text, t.done FROM todo t ORDER BY t.created_at DESC",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all todos")?
        .into_iter()
        .map(Todo::from)
        .collect();

        Ok(todos)
    }
}

impl TodoWriter for DbTodoPersistence {
    async fn insert(&self, todo: &Todo, ext_cxn: &mut impl ExternalConnectivity) -> Result<Todo, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let inserted = query_as::<_, TodoRow>(
            "INSERT INTO todo(uid, created_at, text, done) VALUES ($1, $2, $3, $4) \
             RETURNING uid, created_at, text, done",
        )
        .bind(todo.uid)
        .bind(todo.created_at)
        .bind(&todo.text)
        .bind(todo.done)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(inserted.into())
    }

    async fn delete(&self, uid: Uuid, ext_cxn: &mut impl ExternalConnectivity) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let deleted = query("DELETE FROM todo WHERE uid = $1")
            .bind(uid)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(deleted.rows_affected() == 1)
    }

    async fn update(
        &self,
        uid: Uuid,
        update: &TodoUpdate,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let updated = query_as::<_, TodoRow>(
            "UPDATE todo SET text = COALESCE($2, text), done = COALESCE($3, done) \
             WHERE uid = $1 RETURNING uid, created_at, text, done",
        )
        .bind(uid)
        .bind(update.text.as_deref())
        .bind(update.done)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo in the database")?;

        Ok(updated.map(Todo::from))
    }
}
