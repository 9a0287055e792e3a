pub mod events;

use axum::{
    Extension, Router,
    extract::{RawPathParams, Request},
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use tracing::{error, info};

use crate::SharedState;
use crate::error::AppError;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/events/{event_name}", post(events::inventory_event))
        .layer(middleware::from_fn(log_request))
        .layer(Extension(state))
}

/// Logs pertinent information about every inbound request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!("{} {} {}", method, uri, response.status());
    response
}

/// Fetches a required routing variable from the matched path. An absent
/// variable means the route table and the handler disagree; the request is
/// aborted with a server error before any dispatch happens.
pub(crate) fn require_path_variable(
    params: &RawPathParams,
    name: &str,
) -> Result<String, AppError> {
    match params.iter().find(|(key, _)| *key == name) {
        Some((_, value)) => Ok(value.to_string()),
        None => {
            error!("{name}: there is a misconfiguration in the path variables");
            Err(AppError::PathVariable(name.to_string()))
        }
    }
}
