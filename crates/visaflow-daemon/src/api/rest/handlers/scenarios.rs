//! Demo scenario handlers

use axum::Json;
use serde::Serialize;
use visaflow_catalog::demo_scenarios;
use visaflow_types::Scenario;

/// Scenario list response
#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: Vec<Scenario>,
}

/// List the built-in demo scenarios
pub async fn list_scenarios() -> Json<ScenariosResponse> {
    Json(ScenariosResponse {
        scenarios: demo_scenarios(),
    })
}
