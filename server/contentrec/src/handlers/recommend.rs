//! Recommendation handler
//!
//! POST /recommend
//! POST /api/recommend

use crate::error::{RecError, RecResult};
use crate::model::UserId;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Recommendation request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendRequest {
    /// Any JSON scalar coercible to an integer; `null` counts as absent.
    /// Numbers keep their source digits, so wide integers echo unchanged.
    #[serde(default)]
    pub user_id: Option<Value>,
}

/// Recommendation response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendResponse {
    /// The identifier exactly as it was sent
    pub user_id: Value,
    pub recommendations: Vec<String>,
}

impl RecommendRequest {
    /// The required `user_id`, echoed value plus its parsed form
    pub fn user_id(&self) -> RecResult<(&Value, UserId)> {
        let raw = self
            .user_id
            .as_ref()
            .ok_or(RecError::MissingField("user_id"))?;
        Ok((raw, UserId::from_json(raw)?))
    }
}

/// Recommend top-K content for a user
pub async fn recommend_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> RecResult<Json<RecommendResponse>> {
    let Json(request) = payload.map_err(|rejection| RecError::MalformedBody(rejection.body_text()))?;
    let (raw, user_id) = request.user_id()?;

    debug!("Recommendation request for user_id={}", raw);

    let recommendations = state.recommender.recommend(&user_id)?;

    info!(
        user_id = %raw,
        row = state.recommender.row_index(&user_id),
        count = recommendations.len(),
        "Served recommendations"
    );

    Ok(Json(RecommendResponse {
        user_id: raw.clone(),
        recommendations,
    }))
}
