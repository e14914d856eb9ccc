use tracing::{info, warn};

use super::{DomainError, DomainResult};
use crate::db::DiningStore;
use crate::models::{DiningReview, ReviewStatus};

/// Reviews waiting for an admin decision
#[tracing::instrument(skip(store))]
pub async fn pending_reviews(store: &dyn DiningStore) -> DomainResult<Vec<DiningReview>> {
    Ok(store.find_reviews_by_status(ReviewStatus::Pending).await?)
}

/// Approve or reject a review.
///
/// The submitting user is looked up again at decision time. An approval
/// recomputes the restaurant's scores before returning. A review that was
/// already decided is decided again without complaint; recomputation reads
/// the full approved set, so approving twice does not double count.
#[tracing::instrument(skip(store))]
pub async fn decide_review(
    store: &dyn DiningStore,
    review_id: i64,
    accepted: bool,
) -> DomainResult<DiningReview> {
    let mut review = store
        .find_review_by_id(review_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Review not found".to_string()))?;

    if store
        .find_user_by_display_name(&review.display_name)
        .await?
        .is_none()
    {
        return Err(DomainError::BadRequest(
            "User not found for the review".to_string(),
        ));
    }

    if review.status != ReviewStatus::Pending {
        warn!(
            review_id = review_id,
            previous_status = %review.status,
            "Re-deciding a review that was already moderated"
        );
    }

    review.status = if accepted {
        ReviewStatus::Approved
    } else {
        ReviewStatus::Rejected
    };
    let review = store.save_review(review).await?;
    info!(review_id = review.id, status = %review.status, "Review moderated");

    if review.status == ReviewStatus::Approved {
        match store.recompute_restaurant_scores(review.restaurant_id).await? {
            Some(restaurant) => info!(
                restaurant_id = restaurant.id,
                overall_score = ?restaurant.overall_score,
                "Restaurant scores updated"
            ),
            None => warn!(
                restaurant_id = review.restaurant_id,
                "Restaurant missing during score recompute"
            ),
        }
    }

    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::domain::{add_restaurant, create_user, get_restaurant, submit_review};
    use crate::models::{NewRestaurant, NewReview, NewUser};
    use crate::scoring::calculate_restaurant_scores;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    async fn seeded_store() -> (InMemoryStore, i64) {
        let store = InMemoryStore::new();
        create_user(
            &store,
            NewUser {
                display_name: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let restaurant = add_restaurant(
            &store,
            NewRestaurant {
                name: Some("Clover".to_string()),
                zip_code: Some("02139".to_string()),
            },
        )
        .await
        .unwrap();
        (store, restaurant.id)
    }

    async fn submit(store: &InMemoryStore, restaurant_id: i64, scores: (i16, i16, i16)) -> i64 {
        submit_review(
            store,
            NewReview {
                display_name: Some("alice".to_string()),
                restaurant_id: Some(restaurant_id),
                peanut_score: Some(scores.0),
                dairy_score: Some(scores.1),
                egg_score: Some(scores.2),
                commentary: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_approvals_recompute_scores() {
        let (store, restaurant_id) = seeded_store().await;
        let first = submit(&store, restaurant_id, (4, 5, 3)).await;
        let second = submit(&store, restaurant_id, (2, 3, 1)).await;

        decide_review(&store, first, true).await.unwrap();
        let after_first = get_restaurant(&store, restaurant_id).await.unwrap();
        assert_eq!(after_first.peanut_score, Some(dec!(4.00)));
        assert_eq!(after_first.overall_score, Some(dec!(4.00)));

        let decided = decide_review(&store, second, true).await.unwrap();
        assert_eq!(decided.status, ReviewStatus::Approved);

        let restaurant = get_restaurant(&store, restaurant_id).await.unwrap();
        assert_eq!(restaurant.peanut_score, Some(dec!(3.00)));
        assert_eq!(restaurant.dairy_score, Some(dec!(4.00)));
        assert_eq!(restaurant.egg_score, Some(dec!(2.00)));
        assert_eq!(restaurant.overall_score, Some(dec!(6.00)));
    }

    #[tokio::test]
    async fn test_rejection_leaves_scores_alone() {
        let (store, restaurant_id) = seeded_store().await;
        let approved = submit(&store, restaurant_id, (5, 5, 5)).await;
        let rejected = submit(&store, restaurant_id, (1, 1, 1)).await;
        decide_review(&store, approved, true).await.unwrap();
        let before = get_restaurant(&store, restaurant_id).await.unwrap();

        let review = decide_review(&store, rejected, false).await.unwrap();

        assert_eq!(review.status, ReviewStatus::Rejected);
        assert_eq!(get_restaurant(&store, restaurant_id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_rejection_of_only_review_keeps_scores_unset() {
        let (store, restaurant_id) = seeded_store().await;
        let review = submit(&store, restaurant_id, (3, 3, 3)).await;

        decide_review(&store, review, false).await.unwrap();

        let restaurant = get_restaurant(&store, restaurant_id).await.unwrap();
        assert_eq!(restaurant.peanut_score, None);
        assert_eq!(restaurant.overall_score, None);
    }

    #[tokio::test]
    async fn test_re_approving_is_idempotent_for_scores() {
        let (store, restaurant_id) = seeded_store().await;
        let review = submit(&store, restaurant_id, (4, 2, 1)).await;

        decide_review(&store, review, true).await.unwrap();
        let once = get_restaurant(&store, restaurant_id).await.unwrap();
        decide_review(&store, review, true).await.unwrap();
        let twice = get_restaurant(&store, restaurant_id).await.unwrap();

        assert_eq!(once, twice);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_approvals_converge_on_full_approved_set() {
        let (store, restaurant_id) = seeded_store().await;
        let mut review_ids = Vec::new();
        for i in 0..12i16 {
            let scores = (i % 5 + 1, (i + 2) % 5 + 1, (i * 3) % 5 + 1);
            review_ids.push(submit(&store, restaurant_id, scores).await);
        }

        let store = Arc::new(store);
        let mut approvals = JoinSet::new();
        for review_id in review_ids {
            let store = Arc::clone(&store);
            approvals.spawn(async move { decide_review(store.as_ref(), review_id, true).await });
        }
        while let Some(joined) = approvals.join_next().await {
            joined.unwrap().unwrap();
        }

        let approved = store
            .find_reviews_by_restaurant_and_status(restaurant_id, ReviewStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.len(), 12);
        let expected = calculate_restaurant_scores(&approved).unwrap();

        let restaurant = get_restaurant(store.as_ref(), restaurant_id).await.unwrap();
        assert_eq!(restaurant.peanut_score, Some(expected.peanut));
        assert_eq!(restaurant.dairy_score, Some(expected.dairy));
        assert_eq!(restaurant.egg_score, Some(expected.egg));
        assert_eq!(restaurant.overall_score, Some(expected.overall));
    }

    #[tokio::test]
    async fn test_unknown_review_is_not_found() {
        let (store, _) = seeded_store().await;
        let err = decide_review(&store, 404, true).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_submitter_is_bad_request() {
        let (store, restaurant_id) = seeded_store().await;
        // Written straight to the store, bypassing submission checks
        let orphan = store
            .save_review(DiningReview {
                id: 0,
                display_name: "ghost".to_string(),
                restaurant_id,
                peanut_score: Some(5),
                dairy_score: None,
                egg_score: None,
                commentary: None,
                status: ReviewStatus::Pending,
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let err = decide_review(&store, orphan.id, true).await.unwrap_err();
        assert!(matches!(err, DomainError::BadRequest(_)));

        let unchanged = store.find_review_by_id(orphan.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ReviewStatus::Pending);
    }

    #[tokio::test]
    async fn test_pending_reviews_excludes_decided() {
        let (store, restaurant_id) = seeded_store().await;
        let decided = submit(&store, restaurant_id, (4, 4, 4)).await;
        let waiting = submit(&store, restaurant_id, (2, 2, 2)).await;
        decide_review(&store, decided, true).await.unwrap();

        let pending = pending_reviews(&store).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, waiting);
    }
}
