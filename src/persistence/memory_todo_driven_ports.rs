use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::{Todo, TodoUpdate};
use crate::external_connections::ExternalConnectivity;
use anyhow::{Error, anyhow};
use std::sync::RwLock;
use uuid::Uuid;

/// Keeps todos in process memory for the lifetime of the store. Todos are held newest first.
pub struct InMemoryTodoPersistence {
    pub todos: Vec<Todo>,
}

impl InMemoryTodoPersistence {
    pub fn new() -> InMemoryTodoPersistence {
        InMemoryTodoPersistence { todos: Vec::new() }
    }

    pub fn new_locked() -> RwLock<InMemoryTodoPersistence> {
        RwLock::new(Self::new())
    }
}

fn poisoned<T>(_: T) -> Error {
    anyhow!("in-memory todo store lock poisoned")
}

impl TodoReader for RwLock<InMemoryTodoPersistence> {
    async fn all(&self, _ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let persistence = self.read().map_err(poisoned)?;

        Ok(persistence.todos.clone())
    }
}

impl TodoWriter for RwLock<InMemoryTodoPersistence> {
    async fn insert(
        &self,
        todo: &Todo,
        _ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Todo, Error> {
        let mut persistence = self.write().map_err(poisoned)?;
        persistence.todos.insert(0, todo.clone());

        Ok(todo.clone())
    }

    async fn delete(&self, uid: Uuid, _ext_cxn: &mut impl ExternalConnectivity) -> Result<bool, Error> {
        let mut persistence = self.write().map_err(poisoned)?;
        let todo_count = persistence.todos.len();
        persistence.todos.retain(|todo| todo.uid != uid);

        Ok(todo_count - persistence.todos.len() == 1)
    }

    async fn update(
        &self,
        uid: Uuid,
        update: &TodoUpdate,
        _ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut persistence = self.write().map_err(poisoned)?;
        let Some(todo) = persistence.todos.iter_mut().find(|todo| todo.uid == uid) else {
            return Ok(None);
        };

        if let Some(ref text) = update.text {
            todo.text = text.clone();
        }
        if let Some(done) = update.done {
            todo.done = done;
        }

        Ok(Some(todo.clone()))
    }
}
