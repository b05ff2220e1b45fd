//! Health check endpoints
//!
//! Kubernetes-style probes:
//! - /health, /healthz - liveness (is the service running?)
//! - /ready, /readyz   - readiness (can it take traffic?)
//! - /version          - build information
//!
//! The mock has no external dependencies, so liveness and readiness
//! only differ in intent; both report store statistics so operators
//! can see the lifecycle populations at a glance.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use super::json_response;
use crate::server::AppState;
use crate::store::StoreStats;

/// Health response body
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    /// Current timestamp
    pub timestamp: String,
    /// Node identifier
    pub node_id: String,
    /// Advertised ledger package id, if configured
    #[serde(rename = "packageId", skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    /// Per-sequence contract counts
    pub contracts: StoreStats,
}

fn build_health_response(state: &AppState) -> HealthResponse {
    HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        node_id: state.args.node_id.to_string(),
        package_id: state.args.effective_package_id(),
        contracts: state.ledger.stats(),
    }
}

/// Handle liveness probe (/health, /healthz)
pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &build_health_response(&state))
}

/// Handle readiness probe (/ready, /readyz)
///
/// The store is in-process and always available, so readiness follows
/// liveness. The endpoint exists so deployments can keep a uniform
/// probe configuration.
pub fn readiness_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &build_health_response(&state))
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    /// Cargo package version
    pub version: &'static str,
    /// Git commit hash (short)
    pub commit: &'static str,
    /// Service name
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        service: "scrip",
    };
    json_response(StatusCode::OK, &response)
}
