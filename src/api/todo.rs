use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::dto::todo::{NewTodoForm, OkEnvelope, TodoEnvelope, TodoListEnvelope, TodoPatch};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BasicErrorResponse, Form, Json, TodoErrorResponse, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::get;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use uuid::Uuid;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(list_todos, create_todo, delete_todo, update_todo))]
/// Defines the OpenAPI spec for todo endpoints
pub struct TodoApi;
/// Used to group todo endpoints together in the OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Builds a router for the todo collection ("/todos.json") and item ("/todos/{uid}.json") resources
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todos.json",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};

                list_todos(&mut ext_cxn, &todo_service, &app_state.todo_store).await
            })
            .post(
                |State(app_state): AppState, Form(new_todo): Form<NewTodoForm>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    create_todo(new_todo, &mut ext_cxn, &todo_service, &app_state.todo_store).await
                },
            ),
        )
        .route(
            "/todos/:todo_file",
            axum::routing::delete(
                |State(app_state): AppState, Path(todo_file): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    delete_todo(&todo_file, &mut ext_cxn, &todo_service, &app_state.todo_store)
                        .await
                },
            )
            .patch(
                |State(app_state): AppState,
                 Path(todo_file): Path<String>,
                 Json(body): Json<Value>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    update_todo(
                        &todo_file,
                        TodoPatch::from(body),
                        &mut ext_cxn,
                        &todo_service,
                        &app_state.todo_store,
                    )
                    .await
                },
            ),
        )
}

/// Item routes address a todo by a "{uid}.json" path segment
fn uid_from_todo_file(todo_file: &str) -> Option<Uuid> {
    todo_file
        .strip_suffix(".json")
        .and_then(|raw_uid| Uuid::parse_str(raw_uid).ok())
}

#[utoipa::path(
    get,
    path = "/todos.json",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "All todos, newest first", body = TodoListEnvelope),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists every todo, newest first
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
) -> Result<Json<TodoListEnvelope>, ErrorResponse> {
    info!("Listing todos");
    let todos = todo_service
        .list(&mut *ext_cxn, todo_read)
        .await
        .map_err(|list_err| {
            error!("Could not list todos: {list_err:#}");
            TodoErrorResponse::from(list_err)
        })?;

    Ok(Json(todos.into()))
}

#[utoipa::path(
    post,
    path = "/todos.json",
    tag = TODO_API_GROUP,
    request_body(content = NewTodoForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Todo created", body = TodoEnvelope),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Creates a todo from a form-encoded "text" field
async fn create_todo(
    new_todo: NewTodoForm,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<(StatusCode, Json<TodoEnvelope>), ErrorResponse> {
    new_todo
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let domain_todo = domain::todo::NewTodo::from(new_todo);
    info!("Creating todo: {domain_todo}");

    let created = todo_service
        .create(&domain_todo, &mut *ext_cxn, todo_write)
        .await
        .map_err(|create_err| {
            if !matches!(create_err, TodoError::Invalid(_)) {
                error!("Todo create failure: {create_err:#}");
            }
            TodoErrorResponse::from(create_err)
        })?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    delete,
    path = "/todos/{uid}.json",
    tag = TODO_API_GROUP,
    params(("uid" = Uuid, Path, description = "ID of the todo to delete")),
    responses(
        (status = 200, description = "Todo deleted", body = OkEnvelope),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Deletes a todo
async fn delete_todo(
    todo_file: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<Json<OkEnvelope>, ErrorResponse> {
    let uid = uid_from_todo_file(todo_file).ok_or(TodoErrorResponse(TodoError::NotFound))?;
    info!("Deleting todo {uid}");

    let removed = todo_service
        .delete(uid, &mut *ext_cxn, todo_write)
        .await
        .map_err(|delete_err| {
            error!("Failed to delete todo {uid}: {delete_err:#}");
            TodoErrorResponse::from(delete_err)
        })?;
    if !removed {
        return Err(TodoErrorResponse(TodoError::NotFound).into());
    }

    Ok(Json(OkEnvelope::ok()))
}

#[utoipa::path(
    patch,
    path = "/todos/{uid}.json",
    tag = TODO_API_GROUP,
    params(("uid" = Uuid, Path, description = "ID of the todo to update")),
    request_body = TodoPatch,
    responses(
        (status = 200, description = "Todo updated", body = TodoEnvelope),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
    ),
)]
/// Applies the well-typed fields of a JSON patch to a todo
async fn update_todo(
    todo_file: &str,
    patch: TodoPatch,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<Json<TodoEnvelope>, ErrorResponse> {
    let uid = uid_from_todo_file(todo_file).ok_or(TodoErrorResponse(TodoError::NotFound))?;
    info!("Updating todo {uid}");

    let updated = todo_service
        .update(uid, patch.into(), &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(updated.into()))
}
