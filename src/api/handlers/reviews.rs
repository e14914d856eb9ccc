use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::SharedStore;
use crate::domain;
use crate::models::{DiningReview, MessageResponse, NewReview, StatusFilter};

/// Accepts the review for moderation; it is not visible in scores until approved
#[tracing::instrument(skip(store, payload))]
pub async fn submit_review_handler(
    State(store): State<SharedStore>,
    Json(payload): Json<NewReview>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    info!("Processing review submission");

    let review = domain::submit_review(store.as_ref(), payload).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::with_id(
            "Review submitted successfully",
            review.id,
        )),
    ))
}

#[tracing::instrument(skip(store))]
pub async fn get_review_handler(
    Path(review_id): Path<i64>,
    State(store): State<SharedStore>,
) -> ApiResult<Json<DiningReview>> {
    let review = domain::get_review(store.as_ref(), review_id).await?;
    Ok(Json(review))
}

#[tracing::instrument(skip(store))]
pub async fn reviews_for_restaurant_handler(
    Path(restaurant_id): Path<i64>,
    Query(filter): Query<StatusFilter>,
    State(store): State<SharedStore>,
) -> ApiResult<Json<Vec<DiningReview>>> {
    let reviews = domain::list_reviews_for_restaurant(
        store.as_ref(),
        restaurant_id,
        filter.status.as_deref(),
    )
    .await?;

    Ok(Json(reviews))
}
