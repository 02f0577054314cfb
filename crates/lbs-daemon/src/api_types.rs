//! Response types for the lbs-daemon status API.
//!
//! `Serialize + Deserialize` so tests can decode what Axum encodes. No logic.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}
