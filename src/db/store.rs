//! Persistence abstraction for users, restaurants and reviews.
//!
//! The domain layer only talks to [`DiningStore`]. [`super::PgStore`] backs it
//! with PostgreSQL; [`super::InMemoryStore`] keeps everything in process and
//! is what the test suite runs against.

use async_trait::async_trait;

use crate::db::errors::Result;
use crate::models::{AllergyType, DiningReview, Restaurant, ReviewStatus, User};

/// Query contract consumed by the domain layer.
///
/// `save_*` methods insert when the record's `id` is 0 and update the row
/// with that id otherwise. Inserts that would duplicate a natural key fail
/// with an integrity error.
#[async_trait]
pub trait DiningStore: Send + Sync {
    async fn find_user_by_display_name(&self, display_name: &str) -> Result<Option<User>>;

    async fn save_user(&self, user: User) -> Result<User>;

    async fn find_restaurant_by_id(&self, restaurant_id: i64) -> Result<Option<Restaurant>>;

    async fn find_restaurant_by_name_and_zip_code(
        &self,
        name: &str,
        zip_code: &str,
    ) -> Result<Option<Restaurant>>;

    /// Restaurants in `zip_code` with a non-null score for `allergy`,
    /// ordered by that score descending, ties by ascending id.
    async fn find_restaurants_by_zip_and_score_not_null(
        &self,
        zip_code: &str,
        allergy: AllergyType,
    ) -> Result<Vec<Restaurant>>;

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>>;

    async fn save_restaurant(&self, restaurant: Restaurant) -> Result<Restaurant>;

    async fn find_review_by_id(&self, review_id: i64) -> Result<Option<DiningReview>>;

    async fn find_reviews_by_restaurant_and_status(
        &self,
        restaurant_id: i64,
        status: ReviewStatus,
    ) -> Result<Vec<DiningReview>>;

    async fn find_reviews_by_status(&self, status: ReviewStatus) -> Result<Vec<DiningReview>>;

    async fn find_reviews_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<DiningReview>>;

    async fn save_review(&self, review: DiningReview) -> Result<DiningReview>;

    /// Recompute a restaurant's published scores from its approved reviews.
    ///
    /// Read, compute and write happen as one serialized step per restaurant.
    /// Returns the updated restaurant, or `None` when there was nothing to
    /// write (no approved reviews, or the restaurant no longer exists).
    async fn recompute_restaurant_scores(&self, restaurant_id: i64) -> Result<Option<Restaurant>>;

    async fn health_check(&self) -> Result<()>;
}
