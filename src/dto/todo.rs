use crate::domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// DTO for a todo returned on the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct Todo {
    pub uid: Uuid,
    pub created_at: DateTime<Utc>,
    #[schema(example = "Buy milk")]
    pub text: String,
    #[schema(example = false)]
    pub done: bool,
}

impl From<domain::todo::Todo> for Todo {
    fn from(value: domain::todo::Todo) -> Self {
        Todo {
            uid: value.uid,
            created_at: value.created_at,
            text: value.text,
            done: value.done,
        }
    }
}

impl From<Todo> for domain::todo::Todo {
    fn from(value: Todo) -> Self {
        domain::todo::Todo {
            uid: value.uid,
            created_at: value.created_at,
            text: value.text,
            done: value.done,
        }
    }
}

/// Envelope wrapping the full todo list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoListEnvelope {
    #[schema(example = true)]
    pub ok: bool,
    pub todos: Vec<Todo>,
}

impl From<Vec<domain::todo::Todo>> for TodoListEnvelope {
    fn from(value: Vec<domain::todo::Todo>) -> Self {
        TodoListEnvelope {
            ok: true,
            todos: value.into_iter().map(Todo::from).collect(),
        }
    }
}

/// Envelope wrapping a single created or updated todo
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct TodoEnvelope {
    #[schema(example = true)]
    pub ok: bool,
    pub todo: Todo,
}

impl From<domain::todo::Todo> for TodoEnvelope {
    fn from(value: domain::todo::Todo) -> Self {
        TodoEnvelope {
            ok: true,
            todo: Todo::from(value),
        }
    }
}

/// Envelope for operations which only report success
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct OkEnvelope {
    #[schema(example = true)]
    pub ok: bool,
}

impl OkEnvelope {
    pub fn ok() -> Self {
        OkEnvelope { ok: true }
    }
}

/// Form-encoded body for creating a todo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodoForm {
    #[validate(required)]
    #[schema(example = "Buy milk")]
    pub text: Option<String>,
}

impl From<NewTodoForm> for domain::todo::NewTodo {
    fn from(value: NewTodoForm) -> Self {
        domain::todo::NewTodo {
            text: value.text.unwrap_or_default(),
        }
    }
}

/// JSON body for updating a todo. Fields holding the wrong JSON type are dropped rather
/// than rejected, and unknown fields are ignored.
#[derive(Debug, Default, ToSchema)]
pub struct TodoPatch {
    #[schema(example = "Buy oat milk")]
    pub text: Option<String>,
    #[schema(example = true)]
    pub done: Option<bool>,
}

impl From<Value> for TodoPatch {
    fn from(body: Value) -> Self {
        TodoPatch {
            text: body.get("text").and_then(Value::as_str).map(str::to_owned),
            done: body.get("done").and_then(Value::as_bool),
        }
    }
}

impl From<TodoPatch> for domain::todo::TodoUpdate {
    fn from(value: TodoPatch) -> Self {
        domain::todo::TodoUpdate {
            text: value.text,
            done: value.done,
        }
    }
}
