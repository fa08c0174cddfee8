use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "ToDo RPC API",
    description = "Create, read, update, and delete reminder items over a versioned RPC interface"
))]
struct ToDoServiceApi;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from the [dto] package and the [api][crate::api] submodules.
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = ToDoServiceApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::todo::ToDoApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
