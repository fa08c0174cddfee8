use crate::domain::{ErrorKind, ToDoError};
use axum::BoxError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::{FromRequest, FromRequestParts};
use serde::{Deserialize, Serialize};
use tower::timeout::error::Elapsed;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Contains diagnostic information about an RPC failure
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct BasicErrorResponse {
    #[schema(example = "not_found")]
    pub error_code: String,
    #[schema(example = "ToDo with ID='1' is not found")]
    pub error_description: String,
    pub extra_info: Option<String>,
}

/// The HTTP status each kind of RPC failure is reported with
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Response type that wraps to-do service errors and turns them into [BasicErrorResponse]s
pub struct ToDoErrorResponse(pub ToDoError);

impl IntoResponse for ToDoErrorResponse {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        (
            status_for(kind),
            axum::Json(BasicErrorResponse {
                error_code: kind.code().into(),
                error_description: self.0.to_string(),
                extra_info: None,
            }),
        )
            .into_response()
    }
}

impl From<ToDoError> for ToDoErrorResponse {
    fn from(value: ToDoError) -> Self {
        Self(value)
    }
}

/// Response type for request bodies which parsed but failed validation
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: ErrorKind::InvalidArgument.code().into(),
                error_description: "Submitted data was invalid.".into(),
                extra_info: Some(self.0.to_string()),
            }),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Converts failures raised by middleware into [BasicErrorResponse]s. A call which ran past
/// its deadline is reported as unavailable.
pub async fn middleware_error_response(err: BoxError) -> Response {
    let (kind, error_description) = if err.is::<Elapsed>() {
        (
            ErrorKind::Unavailable,
            "The call did not complete before its deadline.".to_owned(),
        )
    } else {
        (ErrorKind::Unknown, format!("Unhandled middleware failure: {err}"))
    };

    (
        status_for(kind),
        axum::Json(BasicErrorResponse {
            error_code: kind.code().into(),
            error_description,
            extra_info: None,
        }),
    )
        .into_response()
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: "invalid_json".into(),
                error_description:
                    "The passed request body contained malformed or unreadable JSON.".into(),
                extra_info: Some(self.parse_problem),
            }),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Path] which reports unparseable path segments
/// as invalid arguments
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type representing path segments which couldn't be parsed
pub struct PathErrorResponse {
    parse_problem: String,
}

impl From<PathRejection> for PathErrorResponse {
    fn from(value: PathRejection) -> Self {
        PathErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: ErrorKind::InvalidArgument.code().into(),
                error_description: "The request path contained an invalid ID.".into(),
                extra_info: Some(self.parse_problem),
            }),
        )
            .into_response()
    }
}

/// Wrapper for [axum::extract::Query] which reports unreadable query strings
/// as invalid arguments
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(QueryErrorResponse))]
pub struct Query<T>(pub T);

pub struct QueryErrorResponse {
    parse_problem: String,
}

impl From<QueryRejection> for QueryErrorResponse {
    fn from(value: QueryRejection) -> Self {
        QueryErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for QueryErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: ErrorKind::InvalidArgument.code().into(),
                error_description: "The query string could not be read.".into(),
                extra_info: Some(self.parse_problem),
            }),
        )
            .into_response()
    }
}
