//! HTTP request handlers

pub mod health;
pub mod recommend;

pub use health::{health_handler, home_handler, liveness_handler, HealthStatus};
pub use recommend::{recommend_handler, RecommendRequest, RecommendResponse};
