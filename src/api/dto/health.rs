//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Storage backend serving requests.
    pub storage: String,
}
