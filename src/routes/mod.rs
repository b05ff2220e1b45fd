//! HTTP route handlers
//!
//! - `ledger`: the three ledger operations under `/v1/*`
//! - `health`: liveness/readiness probes and version info

pub mod health;
pub mod ledger;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::types::LedgerError;

/// Create a JSON response with permissive CORS headers
///
/// The mock serves a browser console directly, so every response
/// carries `Access-Control-Allow-Origin: *`.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(data)
        .unwrap_or_else(|_| r#"{"errors":["Serialization failed"]}"#.to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Render a ledger failure as the structured error list clients expect
pub(crate) fn ledger_error_response(err: &LedgerError) -> Response<Full<Bytes>> {
    errors_response(err.status_code(), &err.to_string())
}

/// A failure response: `{"errors": ["<message>"]}`
pub(crate) fn errors_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "errors": [message] });
    json_response(status, &body)
}
