use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::{routes::SubscribeError, types::ApiResponse};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::Subscribe(sub_er) => sub_er.status_code_and_client_error(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        let (status, client_error) = self.status_code_and_client_error();
        let mut res = (status, Json(ApiResponse::new(client_error.to_string()))).into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the browser gets to see, always as `{ "message": <Display> }`.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Please provide a valid email address.")]
    InvalidEmail,
    #[display("{_0}")]
    Upstream(String),
    #[display("Unable to subscribe right now.")]
    UpstreamUnavailable,
    #[display("{_0}")]
    Unexpected(String),
    #[display("Unexpected error.")]
    ServiceError,
}

impl ClientError {
    /// Relays an error's own message, unless it has none.
    pub fn unexpected(message: String) -> Self {
        if message.trim().is_empty() {
            Self::ServiceError
        } else {
            Self::Unexpected(message)
        }
    }
}
