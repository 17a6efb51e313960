//! Operational endpoints: FT-style health report, good-to-go, ping and build info.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use organisations_graph::GraphStore;

use crate::AppState;

const SERVICE_NAME: &str = "public-organisations-api";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub schema_version: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub ok: bool,
    pub checks: Vec<CheckResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: &'static str,
    pub name: &'static str,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: &'static str,
    pub technical_summary: &'static str,
    pub panic_guide: &'static str,
    pub check_output: String,
    pub last_updated: String,
}

/// Neo4j connectivity, as reported by the reader.
async fn neo4j_check<S: GraphStore>(state: &AppState<S>) -> CheckResult {
    let (ok, check_output) = match state.reader.check_connectivity().await {
        Ok(()) => (true, "Connectivity to neo4j is ok".to_string()),
        Err(e) => {
            warn!(error = %e, "Neo4j health check failed");
            (false, format!("Error connecting to neo4j: {e}"))
        }
    };
    CheckResult {
        id: "neo4j-check",
        name: "Check connectivity to Neo4j",
        ok,
        severity: 2,
        business_impact: "Unable to respond to Public Organisations api requests",
        technical_summary:
            "Cannot connect to Neo4j a instance with at least one organisation loaded in it",
        panic_guide: "https://dewey.ft.com/public-org-api.html",
        check_output,
        last_updated: Utc::now().to_rfc3339(),
    }
}

pub async fn health<S: GraphStore>(State(state): State<Arc<AppState<S>>>) -> Json<HealthReport> {
    let check = neo4j_check(&state).await;
    Json(HealthReport {
        schema_version: 1,
        name: SERVICE_NAME,
        description: "Public API for serving information on Organisations within the concept store",
        ok: check.ok,
        checks: vec![check],
    })
}

/// 503 as soon as the store is unreachable, for load balancers.
pub async fn good_to_go<S: GraphStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    match state.reader.check_connectivity().await {
        Ok(()) => (StatusCode::OK, "OK".to_string()),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn build_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
