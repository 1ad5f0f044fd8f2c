use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header::ORIGIN, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{
    subscription_client::{self, SubscriptionPayload},
    web::{
        cors::cors_headers,
        types::{ApiResponse, DataParsingError, DeserSubscription, ValidSubscription},
        ClientError, WebResult,
    },
    AppState,
};

pub const METHOD_NOT_ALLOWED_MSG: &str = "Method not allowed";
pub const SUBSCRIBED_MSG: &str = "Subscribed successfully.";
/// Upper bound for a buffered `POST` body.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("failed to read the request body: {0}")]
    BodyReading(#[source] axum::Error),
    #[error("request body is not valid json: {0}")]
    BodyParsing(#[from] serde_json::Error),
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("beehiiv rejected the subscription with status: {status}")]
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("subscription client error: {0}")]
    SubscriptionClient(#[from] subscription_client::Error),
}

impl SubscribeError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use SubscribeError::*;

        match self {
            DataParsing(_) => (StatusCode::BAD_REQUEST, ClientError::InvalidEmail),
            Upstream { status, message } => (
                *status,
                message
                    .clone()
                    .map(ClientError::Upstream)
                    .unwrap_or(ClientError::UpstreamUnavailable),
            ),
            BodyReading(er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::unexpected(er.to_string()),
            ),
            BodyParsing(er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::unexpected(er.to_string()),
            ),
            SubscriptionClient(er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::unexpected(er.to_string()),
            ),
        }
    }
}

// ###################################
// ->   API
// ###################################
/// Handles every method on every path except `GET /health-check`.
///
/// `OPTIONS` answers the CORS preflight, `POST` relays the subscription to beehiiv,
/// anything else is a 405 without CORS headers.
/// The body is only buffered for `POST`, so its size never affects the other branches.
#[tracing::instrument(name = "Handling a subscription request", skip_all, fields(method = %method))]
pub async fn subscribe(
    State(app_state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::NO_CONTENT, cors_headers(headers.get(ORIGIN))).into_response();
    }

    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(ApiResponse::new(METHOD_NOT_ALLOWED_MSG)),
        )
            .into_response();
    }

    let cors = cors_headers(headers.get(ORIGIN));
    (cors, submit_subscription(&app_state, body).await).into_response()
}

async fn submit_subscription(app_state: &AppState, body: Body) -> WebResult<Json<ApiResponse>> {
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(SubscribeError::BodyReading)?;
    // Invalid UTF-8 sequences become U+FFFD instead of failing the whole body.
    let body: Value = serde_json::from_str(&String::from_utf8_lossy(&bytes))
        .map_err(SubscribeError::BodyParsing)?;
    let subscription: ValidSubscription = DeserSubscription::from_json(&body)
        .try_into()
        .map_err(SubscribeError::DataParsing)?;

    let payload = SubscriptionPayload::new(&subscription.email, subscription.weekend);
    let upstream = app_state
        .subscription_api
        .submit_subscription(&payload)
        .await
        .map_err(SubscribeError::SubscriptionClient)?;

    if !upstream.is_success() {
        return Err(SubscribeError::Upstream {
            status: upstream.status,
            message: upstream.message(),
        }
        .into());
    }

    info!("SUCCESS");
    Ok(Json(ApiResponse::new(SUBSCRIBED_MSG)))
}
