use crate::domain;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// DTO for a point in time: seconds since the Unix epoch plus nanoseconds into that second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Timestamp {
    #[schema(example = 1704099600)]
    pub seconds: i64,
    #[serde(default)]
    #[schema(example = 0)]
    pub nanos: i32,
}

impl From<Timestamp> for domain::timestamp::Timestamp {
    fn from(value: Timestamp) -> Self {
        domain::timestamp::Timestamp {
            seconds: value.seconds,
            nanos: value.nanos,
        }
    }
}

impl From<domain::timestamp::Timestamp> for Timestamp {
    fn from(value: domain::timestamp::Timestamp) -> Self {
        Timestamp {
            seconds: value.seconds,
            nanos: value.nanos,
        }
    }
}

/// DTO for a to-do item. The ID is ignored on creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
pub struct ToDo {
    #[serde(default)]
    #[schema(example = 1)]
    pub id: i64,
    #[validate(length(min = 1))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "2%")]
    pub description: String,
    pub reminder: Option<Timestamp>,
}

impl From<ToDo> for domain::todo::NewToDo {
    fn from(value: ToDo) -> Self {
        domain::todo::NewToDo {
            title: value.title,
            description: value.description,
            reminder: value.reminder.map(Into::into),
        }
    }
}

impl From<ToDo> for domain::todo::ToDoItem {
    fn from(value: ToDo) -> Self {
        domain::todo::ToDoItem {
            id: value.id,
            title: value.title,
            description: value.description,
            reminder: value.reminder.map(Into::into),
        }
    }
}

impl From<domain::todo::ToDoItem> for ToDo {
    fn from(value: domain::todo::ToDoItem) -> Self {
        ToDo {
            id: value.id,
            title: value.title,
            description: value.description,
            reminder: value.reminder.map(Into::into),
        }
    }
}

/// Query string carrying the caller's API version on calls without a body
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApiVersionQuery {
    /// API version the caller speaks. Leave empty to skip the version check.
    #[serde(default)]
    #[param(example = "v1")]
    pub api: String,
}

/// DTO for creating a to-do item
#[derive(Debug, Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[serde(default)]
    #[schema(example = "v1")]
    pub api: String,
    pub to_do: ToDo,
}

/// DTO containing the ID of a newly created to-do item
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq))]
pub struct CreateResponse {
    #[schema(example = "v1")]
    pub api: String,
    #[schema(example = 1)]
    pub id: i64,
}

/// DTO for a single fetched to-do item
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    #[schema(example = "v1")]
    pub api: String,
    pub to_do: ToDo,
}

/// DTO for overwriting a to-do item
#[derive(Debug, Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    #[schema(example = "v1")]
    pub api: String,
    pub to_do: ToDo,
}

/// DTO with the number of to-do items an update changed
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq))]
pub struct UpdateResponse {
    #[schema(example = "v1")]
    pub api: String,
    #[schema(example = 1)]
    pub updated: u64,
}

/// DTO with the number of to-do items a delete removed
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq))]
pub struct DeleteResponse {
    #[schema(example = "v1")]
    pub api: String,
    #[schema(example = 1)]
    pub deleted: u64,
}

/// DTO listing every to-do item
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct ReadAllResponse {
    #[schema(example = "v1")]
    pub api: String,
    pub to_dos: Vec<ToDo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_uses_gateway_field_names() {
        let request: CreateRequest = serde_json::from_value(json!({
            "api": "v1",
            "toDo": {
                "title": "Buy milk",
                "description": "2%",
                "reminder": { "seconds": 1704099600, "nanos": 0 }
            }
        }))
        .expect("request should deserialize");

        assert_eq!("v1", request.api);
        assert_eq!(
            domain::todo::NewToDo {
                title: "Buy milk".to_owned(),
                description: "2%".to_owned(),
                reminder: Some(domain::timestamp::Timestamp {
                    seconds: 1_704_099_600,
                    nanos: 0,
                }),
            },
            domain::todo::NewToDo::from(request.to_do)
        );
    }

    #[test]
    fn optional_fields_default() {
        let request: UpdateRequest = serde_json::from_value(json!({
            "toDo": { "title": "Call mom" }
        }))
        .expect("request should deserialize");

        assert_eq!("", request.api);
        assert_eq!(0, request.to_do.id);
        assert_eq!("", request.to_do.description);
        assert_eq!(None, request.to_do.reminder);
    }

    #[test]
    fn read_all_response_serializes_list_under_to_dos() {
        let response = ReadAllResponse {
            api: "v1".to_owned(),
            to_dos: Vec::new(),
        };

        assert_eq!(
            json!({ "api": "v1", "toDos": [] }),
            serde_json::to_value(response).expect("response should serialize")
        );
    }

    #[test]
    fn empty_title_fails_validation() {
        let nameless = ToDo {
            id: 0,
            title: String::new(),
            description: "2%".to_owned(),
            reminder: None,
        };

        let validation_result = nameless.validate();
        let Err(errors) = validation_result else {
            panic!("empty title passed validation");
        };
        assert!(errors.field_errors().contains_key("title"));
    }
}
