use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// JSON result message used by every non-204 response.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The request body could not be decoded for the dispatched event kind.
    #[error("error {0}")]
    BadRequest(String),

    /// The event name is outside the closed set of recognized kinds.
    #[error("unsupported event name '{0}'")]
    UnsupportedEvent(String),

    /// A required routing variable was absent from the matched path.
    #[error("{0}: there is a misconfiguration in the path variables")]
    PathVariable(String),

    /// A downstream PowerDNS call failed.
    #[error("error {0}")]
    Provider(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedEvent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PathVariable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(Message {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
