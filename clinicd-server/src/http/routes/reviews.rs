//! Review endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db::repos::ReviewRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{NewReview, Review};

/// Review response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct SubmittedResponse {
    pub message: &'static str,
}

/// POST /api/reviews - validate then create
async fn submit_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewReview>,
) -> Result<(StatusCode, Json<SubmittedResponse>), ApiError> {
    let valid = payload.validate()?;
    ReviewRepo::new(&state.pool).create(valid).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedResponse {
            message: "Review submitted",
        }),
    ))
}

/// GET /api/reviews - high-rated reviews, newest first
async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = ReviewRepo::new(&state.pool).list_high_rated().await?;
    Ok(Json(
        reviews.into_iter().map(ReviewResponse::from).collect(),
    ))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/reviews", get(list_reviews).post(submit_review))
}
