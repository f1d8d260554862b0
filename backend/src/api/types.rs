//! JSON bodies served next to the plain-text operation routes.

use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::transform::Operation;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "ok" when the server answers
    pub status: String,
    pub service: String,
    pub version: String,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
    pub operations: Vec<OperationInfo>,
}

/// One operation route, as advertised by the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub name: String,
    /// e.g. "POST /sum"
    pub route: String,
    pub description: String,
}

impl From<Operation> for OperationInfo {
    fn from(op: Operation) -> Self {
        OperationInfo {
            name: op.name().to_string(),
            route: format!("POST {}", op.route()),
            description: op.description().to_string(),
        }
    }
}

impl HealthResponse {
    pub fn new(config: &ServerConfig) -> Self {
        HealthResponse {
            status: "ok".to_string(),
            service: "gridcalc".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_upload_bytes: config.max_upload_bytes,
            operations: Operation::ALL.into_iter().map(OperationInfo::from).collect(),
        }
    }
}
