//! Service status endpoints
//!
//! GET /             - service banner, always healthy while the process serves
//! GET /health       - status with version, uptime and model dimensions
//! GET /health/live  - liveness probe

use crate::server::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Banner returned by `GET /`
pub const SERVICE_MESSAGE: &str = "AI-Powered Content Recommendation ML Service is running";

/// Overall health status. The service holds no external dependencies, so a
/// process that answers is healthy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
    pub status: HealthStatus,
}

/// Dimensions of the loaded model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub num_users: usize,
    pub num_items: usize,
    pub top_k: usize,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelInfo,
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub alive: bool,
    pub timestamp: DateTime<Utc>,
}

pub async fn home_handler() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: SERVICE_MESSAGE.to_string(),
        status: HealthStatus::Healthy,
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let recommender = &state.recommender;
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.startup_time.elapsed().as_secs(),
        model: ModelInfo {
            num_users: recommender.num_users(),
            num_items: recommender.num_items(),
            top_k: recommender.top_k(),
        },
    })
}

/// Liveness probe - minimal check to determine if process is alive
pub async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        alive: true,
        timestamp: Utc::now(),
    })
}
