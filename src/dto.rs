use crate::routing_utils::{BasicErrorResponse, ExtraInfo};
use utoipa::OpenApi;

pub mod todo;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            todo::Todo,
            todo::TodoListEnvelope,
            todo::TodoEnvelope,
            todo::OkEnvelope,
            todo::NewTodoForm,
            todo::TodoPatch,
            ExtraInfo,
        ),
        responses(BasicErrorResponse),
    )
)]
/// Captures OpenAPI schemas and canned responses defined in the DTO module
pub struct OpenApiSchemas;
