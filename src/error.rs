use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error taxonomy for the link registry core.
///
/// Validation errors are converted to client-error responses at the router
/// boundary; dependency failures surface as opaque server errors. Each write
/// is a single atomic store operation, so no partial state exists to unwind.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input was missing or empty (e.g. the `url` parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    /// The resolution target does not exist.
    #[error("not found")]
    NotFound,

    /// Repeated key collisions exceeded the retry budget.
    #[error("keyspace exhausted after {0} attempts")]
    KeyspaceExhausted(u32),

    /// The durable link store could not complete the operation.
    #[error("link store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),

    /// The API key registry could not be listed; no authorization decision
    /// can be made.
    #[error("key registry unavailable")]
    RegistryUnavailable(#[source] anyhow::Error),

    /// The OS entropy source failed during key generation.
    #[error("random source unavailable")]
    RandomSourceUnavailable(#[source] rand::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidRequest(reason) => {
                tracing::debug!("rejecting request: {}", reason);
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::KeyspaceExhausted(attempts) => {
                tracing::error!("key generation exhausted after {} attempts", attempts);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::StoreUnavailable(e) => {
                tracing::error!("link store error: {:?}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::RegistryUnavailable(e) => {
                tracing::error!("api key registry error: {:?}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::RandomSourceUnavailable(e) => {
                tracing::error!("entropy source error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Responses deliberately carry no body; status alone tells the
        // client everything it is entitled to know.
        status.into_response()
    }
}
