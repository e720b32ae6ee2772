// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_changelog::ChangeLogError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Change log error: {0}")]
    ChangeLog(#[from] ChangeLogError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ChangeLog(err) => match err {
                ChangeLogError::NotFound(name) => {
                    (StatusCode::NOT_FOUND, format!("Entry not found: {}", name))
                }
                ChangeLogError::AlertNotFound(id) => {
                    (StatusCode::NOT_FOUND, format!("Alert not found: {}", id))
                }
                ChangeLogError::InvalidParameter(msg) => (StatusCode::BAD_REQUEST, msg),
                other => {
                    tracing::error!("Request failed: {}", other);
                    (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
                }
            },
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
