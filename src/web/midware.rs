use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::Response,
};
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Logs every response together with the `web::Error` that produced it, if any.
/// The response itself is passed through untouched.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    // The request id is propagated to the response before this runs.
    let req_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_error = web_error.map(|er| er.status_code_and_client_error().1);

    log::log_request(
        req_id,
        &req_method,
        &uri,
        resp.status(),
        web_error,
        client_error.as_ref(),
    );

    resp
}
