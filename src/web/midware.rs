use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns an `Error` stashed in the response extensions into the JSON body the page expects:
/// `{ "success": false, "message": ..., "email"?: ... }`.
///
/// Runs after `PropagateRequestIdLayer` so the request id header is already on `resp`,
/// it gets copied over to the error response.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let request_id = resp.headers().get(REQUEST_ID_HEADER).cloned();
    let uuid = request_id
        .as_ref()
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(er), Some((status, _))) = (web_error, client_status_and_error.as_ref()) {
        if status.is_server_error() {
            tracing::error!("SERVER ERROR: {er} ID: {uuid}");
        }
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let mut client_error_body = json!({
            "success": false,
            "message": cl_err.to_string(),
        });
        if let Some(email) = cl_err.email() {
            client_error_body["email"] = json!(email);
        }

        let mut res = (*status, Json(client_error_body)).into_response();
        if let Some(request_id) = request_id.clone() {
            res.headers_mut().insert(REQUEST_ID_HEADER, request_id);
        }
        res
    });

    log::log_request(
        uuid,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error.as_ref(),
    )
    .await;

    err_resp.unwrap_or(resp)
}
