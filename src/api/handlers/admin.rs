// Admin moderation endpoints. No authentication layer sits in front of these.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::SharedStore;
use crate::domain;
use crate::models::{MessageResponse, PendingReviewsResponse, ReviewDecision};

#[tracing::instrument(skip(store))]
pub async fn pending_reviews_handler(
    State(store): State<SharedStore>,
) -> ApiResult<Json<PendingReviewsResponse>> {
    let pending_reviews = domain::pending_reviews(store.as_ref()).await?;
    info!("Returning {} pending reviews", pending_reviews.len());

    Ok(Json(PendingReviewsResponse { pending_reviews }))
}

#[tracing::instrument(skip(store), fields(accepted = decision.accepted))]
pub async fn decide_review_handler(
    Path(review_id): Path<i64>,
    State(store): State<SharedStore>,
    Json(decision): Json<ReviewDecision>,
) -> ApiResult<Json<MessageResponse>> {
    info!("Processing moderation decision");

    domain::decide_review(store.as_ref(), review_id, decision.accepted).await?;

    Ok(Json(MessageResponse::new("Review status updated successfully")))
}
