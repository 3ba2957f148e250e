use crate::domain::page::driven_ports::TodoListSource;
use crate::domain::todo::Todo;
use crate::dto;
use crate::external_connections::ExternalConnectivity;
use anyhow::{Context, Error};

/// Fetches the todo list for the page from this service's own collection endpoint over HTTP
pub struct HttpTodoListSource {
    base_url: String,
}

impl HttpTodoListSource {
    pub fn new(base_url: &str) -> Self {
        HttpTodoListSource {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn list_url(&self) -> String {
        format!("{}/todos.json", self.base_url)
    }
}

impl TodoListSource for HttpTodoListSource {
    async fn fetch_todos(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let list_url = self.list_url();
        let envelope: dto::todo::TodoListEnvelope = ext_cxn
            .http_client()
            .get(&list_url)
            .send()
            .await
            .with_context(|| format!("requesting the todo list from {list_url}"))?
            .error_for_status()
            .context("todo list request was unsuccessful")?
            .json()
            .await
            .context("decoding the todo list response")?;

        Ok(envelope.todos.into_iter().map(Todo::from).collect())
    }
}
