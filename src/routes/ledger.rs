//! Ledger operation routes
//!
//! The JSON API surface the console talks to:
//! - `POST /v1/query`    - active contracts for the first requested template
//! - `POST /v1/create`   - create a ReceivableAsset
//! - `POST /v1/exercise` - run a lifecycle choice on a contract
//!
//! Successes are wrapped as `{"status": 200, "result": ...}`; failures
//! as `{"errors": ["<message>"]}` with a 400/404 status. Both shapes
//! mirror what a real ledger JSON API returns, so the console cannot
//! tell the mock apart.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{errors_response, json_response, ledger_error_response};
use crate::ledger;
use crate::server::AppState;
use crate::template::TemplateRef;
use crate::types::LedgerError;

#[derive(Debug, Deserialize)]
struct QueryRequest {
    /// Only the first element is consulted
    #[serde(rename = "templateIds", default)]
    template_ids: Vec<TemplateRef>,
    /// Query filter accepted for API compatibility, ignored by the mock
    #[serde(default)]
    #[allow(dead_code)]
    query: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CreateRequest {
    #[serde(rename = "templateId")]
    template_id: Option<TemplateRef>,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct ExerciseRequest {
    #[serde(rename = "templateId")]
    template_id: Option<TemplateRef>,
    #[serde(rename = "contractId", default)]
    contract_id: String,
    #[serde(default)]
    choice: String,
    #[serde(default)]
    argument: Option<Value>,
}

/// Handle `POST /v1/query`
pub async fn handle_query(req: Request<Incoming>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let body: QueryRequest = match read_json(req).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    match ledger::query(&state.ledger, &body.template_ids) {
        Ok(contracts) => ok_response(&contracts),
        Err(err) => ledger_error_response(&err),
    }
}

/// Handle `POST /v1/create`
pub async fn handle_create(req: Request<Incoming>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let body: CreateRequest = match read_json(req).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let Some(template_id) = body.template_id else {
        return ledger_error_response(&LedgerError::InvalidTemplate);
    };

    match ledger::create(&state.ledger, &template_id, body.payload) {
        Ok(contract) => ok_response(&contract),
        Err(err) => ledger_error_response(&err),
    }
}

/// Handle `POST /v1/exercise`
pub async fn handle_exercise(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let body: ExerciseRequest = match read_json(req).await {
        Ok(body) => body,
        Err(resp) => return resp,
    };

    let Some(template_id) = body.template_id else {
        return ledger_error_response(&LedgerError::InvalidTemplate);
    };

    match ledger::exercise(
        &state.ledger,
        &template_id,
        &body.contract_id,
        &body.choice,
        body.argument.as_ref(),
    ) {
        Ok(ack) => ok_response(&ack),
        Err(err) => ledger_error_response(&err),
    }
}

/// Read and deserialize a JSON request body
///
/// A body that cannot be read or parsed is a caller error, reported
/// through the same structured error list as ledger failures.
async fn read_json<T: DeserializeOwned>(
    req: Request<Incoming>,
) -> Result<T, Response<Full<Bytes>>> {
    let bytes = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "Failed to read request body");
            return Err(errors_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(error = %e, "Malformed JSON body");
        errors_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON body: {e}"))
    })
}

/// Success wrapper: `{"status": 200, "result": ...}`
fn ok_response<T: serde::Serialize>(result: &T) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "status": 200,
        "result": result,
    });
    json_response(StatusCode::OK, &body)
}
