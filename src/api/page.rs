use crate::domain::page::TodoPage;
use crate::domain::page::driven_ports::TodoListSource;
use crate::domain::page::driving_ports::PagePort;
use crate::external_connections::ExternalConnectivity;
use crate::{AppState, SharedData, domain};
use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// Builds a router serving the rendered todo page at "/"
pub fn page_routes() -> Router<Arc<SharedData>> {
    Router::new().route(
        "/",
        get(|State(app_state): AppState| async move {
            let mut ext_cxn = app_state.ext_cxn.clone();
            let page_service = domain::page::PageService {};

            todo_page(&mut ext_cxn, &page_service, &app_state.page_source).await
        }),
    )
}

/// Renders the todo list page. Always succeeds, showing no todos if they couldn't be loaded.
async fn todo_page(
    ext_cxn: &mut impl ExternalConnectivity,
    page_service: &impl PagePort,
    list_source: &impl TodoListSource,
) -> Html<String> {
    info!("Rendering todo page");
    let page = page_service.load_page(&mut *ext_cxn, list_source).await;

    Html(render(&page))
}

fn render(page: &TodoPage) -> String {
    let mut items = String::new();
    for todo in &page.todos {
        let done_class = if todo.done { " class=\"done\"" } else { "" };
        let checked = if todo.done { " checked" } else { "" };
        // Writing to a String can't fail
        let _ = write!(
            items,
            "\n      <li{done_class} data-uid=\"{}\"><input type=\"checkbox\" disabled{checked}> {}</li>",
            todo.uid,
            escape_html(&todo.text),
        );
    }
    if page.todos.is_empty() {
        items.push_str("\n      <li class=\"empty\">Nothing to do!</li>");
    }

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
  <head>
    <meta charset=\"utf-8\">
    <title>Todos</title>
  </head>
  <body>
    <h1>Todos</h1>
    <ul class=\"todos\">{items}
    </ul>
  </body>
</html>
"
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::test_util::FakeTodoListSource;
    use crate::domain::todo::test_util::todo_with_text;
    use crate::external_connections;
    use anyhow::anyhow;

    #[test]
    fn escapes_markup_in_todo_text() {
        assert_eq!(
            "&lt;b&gt;Tom &amp; Jerry&#39;s &quot;plan&quot;&lt;/b&gt;",
            escape_html("<b>Tom & Jerry's \"plan\"</b>")
        );
    }

    #[tokio::test]
    async fn renders_fetched_todos() {
        let list_source = FakeTodoListSource::new_locked();
        let done_todo = domain::todo::Todo {
            done: true,
            ..todo_with_text("Walk the dog")
        };
        list_source
            .lock()
            .expect("list source mutex poisoned")
            .fetch_todos_result
            .set_returned_anyhow(Ok(vec![todo_with_text("<Buy milk>"), done_todo.clone()]));
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();

        let Html(page) = todo_page(&mut ext_cxn, &domain::page::PageService {}, &list_source).await;
        assert!(page.contains("&lt;Buy milk&gt;"));
        assert!(page.contains(&format!("<li class=\"done\" data-uid=\"{}\">", done_todo.uid)));
        assert!(!page.contains("Nothing to do!"));
    }

    #[tokio::test]
    async fn renders_empty_list_when_fetch_fails() {
        let list_source = FakeTodoListSource::new_locked();
        list_source
            .lock()
            .expect("list source mutex poisoned")
            .fetch_todos_result
            .set_returned_anyhow(Err(anyhow!("connection refused")));
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();

        let Html(page) = todo_page(&mut ext_cxn, &domain::page::PageService {}, &list_source).await;
        assert!(page.contains("Nothing to do!"));
        assert!(!page.contains("data-uid"));
    }
}
