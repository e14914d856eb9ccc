use chrono::Utc;
use tracing::info;

use super::validation::validate_new_review;
use super::{DomainError, DomainResult};
use crate::db::DiningStore;
use crate::models::{DiningReview, NewReview, ReviewStatus};

/// Submit a review for moderation. New reviews are always PENDING.
#[tracing::instrument(
    skip(store, new_review),
    fields(
        display_name = ?new_review.display_name,
        restaurant_id = ?new_review.restaurant_id
    )
)]
pub async fn submit_review(store: &dyn DiningStore, new_review: NewReview) -> DomainResult<DiningReview> {
    validate_new_review(store, &new_review).await?;

    let review = DiningReview {
        id: 0,
        display_name: new_review.display_name.unwrap_or_default(),
        restaurant_id: new_review.restaurant_id.unwrap_or_default(),
        peanut_score: new_review.peanut_score,
        dairy_score: new_review.dairy_score,
        egg_score: new_review.egg_score,
        commentary: new_review.commentary,
        status: ReviewStatus::Pending,
        created_at: Utc::now(),
    };

    let stored = store.save_review(review).await?;
    info!(review_id = stored.id, "Review submitted for moderation");
    Ok(stored)
}

#[tracing::instrument(skip(store))]
pub async fn get_review(store: &dyn DiningStore, review_id: i64) -> DomainResult<DiningReview> {
    store
        .find_review_by_id(review_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Review not found".to_string()))
}

/// All reviews of a restaurant, optionally narrowed to one status
/// (case-insensitive).
#[tracing::instrument(skip(store))]
pub async fn list_reviews_for_restaurant(
    store: &dyn DiningStore,
    restaurant_id: i64,
    status: Option<&str>,
) -> DomainResult<Vec<DiningReview>> {
    let reviews = match status {
        None => store.find_reviews_by_restaurant(restaurant_id).await?,
        Some(raw) => {
            let status: ReviewStatus = raw
                .parse()
                .map_err(|_| DomainError::BadRequest("Invalid review status".to_string()))?;
            store
                .find_reviews_by_restaurant_and_status(restaurant_id, status)
                .await?
        }
    };

    Ok(reviews)
}
