use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Command(#[from] larder_shared::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found.")]
    NotFound,

    #[error("Authentication credentials were not provided.")]
    Unauthorized,

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalError(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// JSON error body, `fields` maps each invalid field to its messages.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            fields: BTreeMap::new(),
        }
    }
}

fn field_message(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "length" if error.params.get("value").is_some_and(|v| v == "") => {
            "This field may not be blank.".to_string()
        }
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => {
                format!("Ensure this field has between {min} and {max} characters.")
            }
            (None, Some(max)) => format!("Ensure this field has no more than {max} characters."),
            (Some(min), None) => format!("Ensure this field has at least {min} characters."),
            _ => "Invalid length.".to_string(),
        },
        "range" => match param("min") {
            Some(min) => format!("Ensure this value is greater than or equal to {min}."),
            None => "Value out of range.".to_string(),
        },
        "email" => "Enter a valid email address.".to_string(),
        "url" => "Enter a valid URL.".to_string(),
        code => format!("Invalid value ({code})."),
    }
}

/// Flattens nested errors into `tags[0].name` style keys.
fn collect_fields(errors: &ValidationErrors, prefix: &str, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(errors) => {
                out.entry(key)
                    .or_default()
                    .extend(errors.iter().map(field_message));
            }
            ValidationErrorsKind::Struct(errors) => collect_fields(errors, &key, out),
            ValidationErrorsKind::List(items) => {
                for (index, errors) in items {
                    collect_fields(errors, &format!("{key}[{index}]"), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            AppError::Command(larder_shared::Error::Validate(errors)) => {
                let mut body = ErrorBody::new("Invalid input.");
                collect_fields(&errors, "", &mut body.fields);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Command(larder_shared::Error::User(msg)) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(msg))
            }
            AppError::Command(larder_shared::Error::NotFound(_)) | AppError::NotFound => {
                (StatusCode::NOT_FOUND, ErrorBody::new("Not found."))
            }
            AppError::Command(larder_shared::Error::Unauthorized) | AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Authentication credentials were not provided."),
            ),
            AppError::Command(e) => {
                tracing::error!("Command error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("An unexpected error occurred. Please try again later."),
                )
            }
            AppError::InternalError(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("An unexpected error occurred. Please try again later."),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
