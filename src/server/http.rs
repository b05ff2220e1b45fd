//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Requests are
//! dispatched by (method, path); the ledger operations live under
//! `/v1/*` and probes at the root.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Args;
use crate::routes;
use crate::store::LedgerStore;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// The contract store; one logical owner per process
    pub ledger: Arc<LedgerStore>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create AppState with a fresh, empty store
    pub fn new(args: Args) -> Self {
        Self {
            args,
            ledger: Arc::new(LedgerStore::new()),
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Mock ledger JSON API listening on http://{}/v1 as node {}",
        state.args.listen, state.args.node_id
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // Ledger operations
        (Method::POST, "/v1/query") => {
            routes::ledger::handle_query(req, Arc::clone(&state)).await
        }
        (Method::POST, "/v1/create") => {
            routes::ledger::handle_create(req, Arc::clone(&state)).await
        }
        (Method::POST, "/v1/exercise") => {
            routes::ledger::handle_exercise(req, Arc::clone(&state)).await
        }

        // The ledger endpoints are POST-only; a GET there is a caller
        // mixing up verbs, not an unknown path
        (_, "/v1/query") | (_, "/v1/create") | (_, "/v1/exercise") => {
            routes::errors_response(StatusCode::METHOD_NOT_ALLOWED, "Use POST")
        }

        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health::health_check(Arc::clone(&state))
        }

        // Readiness probe
        (Method::GET, "/ready") | (Method::GET, "/readyz") => {
            routes::health::readiness_check(Arc::clone(&state))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => routes::health::version_info(),

        // CORS preflight
        (Method::OPTIONS, _) => preflight_response(),

        // Root: point callers at the API
        (Method::GET, "/") => hint_response(),

        _ => not_found_response(&path),
    };

    Ok(response)
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Root hint response
fn hint_response() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "service": "scrip",
        "hint": "POST /v1/query, /v1/create, /v1/exercise",
    });

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "errors": ["Not Found"],
        "path": path,
    });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
