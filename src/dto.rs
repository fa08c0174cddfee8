use utoipa::OpenApi;

pub mod todo;

pub use todo::*;

/// Registers every DTO as an OpenAPI schema component
#[derive(OpenApi)]
#[openapi(components(schemas(
    Timestamp,
    ToDo,
    CreateRequest,
    CreateResponse,
    ReadResponse,
    UpdateRequest,
    UpdateResponse,
    DeleteResponse,
    ReadAllResponse,
    crate::routing_utils::BasicErrorResponse,
)))]
pub struct OpenApiSchemas;
