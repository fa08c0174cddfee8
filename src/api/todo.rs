use crate::domain::todo::API_VERSION;
use crate::domain::todo::driving_ports::ToDoPort;
use crate::domain::{ErrorKind, ToDoError, todo};
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::{DbToDoReader, DbToDoWriter};
use crate::routing_utils::{
    BasicErrorResponse, Json, Path, Query, ToDoErrorResponse, ValidationErrorResponse,
};
use crate::{AppState, SharedData, dto};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use validator::{Validate, ValidationErrors};

#[derive(OpenApi)]
#[openapi(paths(create, read, update, delete, read_all))]
/// Defines the OpenAPI documentation for the to-do RPCs
pub struct ToDoApi;
/// Constant used to group to-do endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "ToDo";

/// Builds a router exposing the to-do RPCs under "/v1/todo"
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/v1/todo",
            post(
                |State(app_state): AppState, Json(request): Json<dto::CreateRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    create(request, &mut ext_cxn, &todo::ToDoService {}).await
                },
            ),
        )
        .route(
            "/v1/todo/all",
            get(
                |State(app_state): AppState, Query(query): Query<dto::ApiVersionQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    read_all(query, &mut ext_cxn, &todo::ToDoService {}).await
                },
            ),
        )
        .route(
            "/v1/todo/:id",
            get(
                |State(app_state): AppState,
                 Path(id): Path<i64>,
                 Query(query): Query<dto::ApiVersionQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    read(id, query, &mut ext_cxn, &todo::ToDoService {}).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(id): Path<i64>,
                 Json(request): Json<dto::UpdateRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    update(id, request, &mut ext_cxn, &todo::ToDoService {}).await
                },
            )
            .delete(
                |State(app_state): AppState,
                 Path(id): Path<i64>,
                 Query(query): Query<dto::ApiVersionQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    delete(id, query, &mut ext_cxn, &todo::ToDoService {}).await
                },
            ),
        )
}

/// Logs a failed RPC at a level matching who caused it and converts it to a response
fn report_failure(operation: &str, err: ToDoError) -> ErrorResponse {
    let kind = err.kind();
    if kind.is_client_error() {
        info!(error_code = kind.code(), "{operation} rejected: {err}");
    } else {
        error!(error_code = kind.code(), "{operation} failed: {err}");
    }

    ToDoErrorResponse(err).into()
}

/// Rejects a to-do item whose fields fail validation. The API version is checked first
/// so an unsupported version is reported ahead of any field problem.
fn validate_todo(operation: &str, api: &str, to_do: &dto::ToDo) -> Result<(), ErrorResponse> {
    todo::check_api(api).map_err(|err| report_failure(operation, err))?;
    to_do.validate().map_err(|errors: ValidationErrors| {
        info!(
            error_code = ErrorKind::InvalidArgument.code(),
            "{operation} rejected: {errors}"
        );
        ValidationErrorResponse::from(errors).into()
    })
}

#[utoipa::path(
    post,
    path = "/v1/todo",
    tag = TODO_API_GROUP,
    request_body = dto::CreateRequest,
    responses(
        (status = 200, description = "The to-do item was created", body = dto::CreateResponse),
        (status = 400, description = "The title was empty or the reminder was missing or out of range", body = BasicErrorResponse),
        (status = 501, description = "The requested API version isn't implemented", body = BasicErrorResponse),
        (status = 500, description = "The store failed to save the item", body = BasicErrorResponse),
        (status = 503, description = "No database connection could be acquired", body = BasicErrorResponse),
    ),
)]
/// Creates a to-do item and returns its generated ID
async fn create(
    request: dto::CreateRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl ToDoPort,
) -> Result<Json<dto::CreateResponse>, ErrorResponse> {
    info!("Creating a ToDo");
    validate_todo("Create", &request.api, &request.to_do)?;
    let new_todo = todo::NewToDo::from(request.to_do);
    let todo_writer = DbToDoWriter;

    let created_id = todo_service
        .create(&request.api, &new_todo, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| report_failure("Create", err))?;

    Ok(Json(dto::CreateResponse {
        api: API_VERSION.to_owned(),
        id: created_id,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/todo/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = i64, Path, description = "ID of the to-do item to fetch"),
        dto::ApiVersionQuery,
    ),
    responses(
        (status = 200, description = "The requested to-do item", body = dto::ReadResponse),
        (status = 404, description = "No to-do item has the given ID", body = BasicErrorResponse),
        (status = 501, description = "The requested API version isn't implemented", body = BasicErrorResponse),
        (status = 500, description = "The store failed or holds inconsistent data", body = BasicErrorResponse),
        (status = 503, description = "No database connection could be acquired", body = BasicErrorResponse),
    ),
)]
/// Fetches a single to-do item by ID
async fn read(
    id: i64,
    query: dto::ApiVersionQuery,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl ToDoPort,
) -> Result<Json<dto::ReadResponse>, ErrorResponse> {
    info!("Reading ToDo {id}");
    let todo_reader = DbToDoReader;

    let item = todo_service
        .read(&query.api, id, &mut *ext_cxn, &todo_reader)
        .await
        .map_err(|err| report_failure("Read", err))?;

    Ok(Json(dto::ReadResponse {
        api: API_VERSION.to_owned(),
        to_do: dto::ToDo::from(item),
    }))
}

#[utoipa::path(
    put,
    path = "/v1/todo/{id}",
    tag = TODO_API_GROUP,
    params(("id" = i64, Path, description = "ID of the to-do item to overwrite")),
    request_body = dto::UpdateRequest,
    responses(
        (status = 200, description = "The to-do item was overwritten", body = dto::UpdateResponse),
        (status = 400, description = "The title was empty or the reminder was missing or out of range", body = BasicErrorResponse),
        (status = 404, description = "No to-do item has the given ID", body = BasicErrorResponse),
        (status = 501, description = "The requested API version isn't implemented", body = BasicErrorResponse),
        (status = 500, description = "The store failed to save the item", body = BasicErrorResponse),
        (status = 503, description = "No database connection could be acquired", body = BasicErrorResponse),
    ),
)]
/// Overwrites every field of a to-do item. The ID in the path takes precedence over one in the body.
async fn update(
    id: i64,
    request: dto::UpdateRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl ToDoPort,
) -> Result<Json<dto::UpdateResponse>, ErrorResponse> {
    info!("Updating ToDo {id}");
    validate_todo("Update", &request.api, &request.to_do)?;
    let mut item = todo::ToDoItem::from(request.to_do);
    item.id = id;
    let todo_writer = DbToDoWriter;

    let updated = todo_service
        .update(&request.api, &item, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| report_failure("Update", err))?;

    Ok(Json(dto::UpdateResponse {
        api: API_VERSION.to_owned(),
        updated,
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/todo/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = i64, Path, description = "ID of the to-do item to remove"),
        dto::ApiVersionQuery,
    ),
    responses(
        (status = 200, description = "The to-do item was removed", body = dto::DeleteResponse),
        (status = 404, description = "No to-do item has the given ID", body = BasicErrorResponse),
        (status = 501, description = "The requested API version isn't implemented", body = BasicErrorResponse),
        (status = 500, description = "The store failed to remove the item", body = BasicErrorResponse),
        (status = 503, description = "No database connection could be acquired", body = BasicErrorResponse),
    ),
)]
/// Removes a to-do item
async fn delete(
    id: i64,
    query: dto::ApiVersionQuery,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl ToDoPort,
) -> Result<Json<dto::DeleteResponse>, ErrorResponse> {
    info!("Deleting ToDo {id}");
    let todo_writer = DbToDoWriter;

    let deleted = todo_service
        .delete(&query.api, id, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| report_failure("Delete", err))?;

    Ok(Json(dto::DeleteResponse {
        api: API_VERSION.to_owned(),
        deleted,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/todo/all",
    tag = TODO_API_GROUP,
    params(dto::ApiVersionQuery),
    responses(
        (status = 200, description = "Every to-do item, in the store's scan order", body = dto::ReadAllResponse),
        (status = 501, description = "The requested API version isn't implemented", body = BasicErrorResponse),
        (status = 500, description = "The store failed or holds an unreadable item", body = BasicErrorResponse),
        (status = 503, description = "No database connection could be acquired", body = BasicErrorResponse),
    ),
)]
/// Lists every to-do item. There's no paging, so the whole table comes back in one response.
async fn read_all(
    query: dto::ApiVersionQuery,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl ToDoPort,
) -> Result<Json<dto::ReadAllResponse>, ErrorResponse> {
    info!("Reading every ToDo");
    let todo_reader = DbToDoReader;

    let items = todo_service
        .read_all(&query.api, &mut *ext_cxn, &todo_reader)
        .await
        .map_err(|err| report_failure("ReadAll", err))?;

    Ok(Json(dto::ReadAllResponse {
        api: API_VERSION.to_owned(),
        to_dos: items.into_iter().map(dto::ToDo::from).collect(),
    }))
}
