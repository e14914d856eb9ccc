use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::db::connection::{ping, with_retry};
use crate::db::errors::Result;
use crate::db::store::DiningStore;
use crate::db::{read_ops, write_ops};
use crate::models::{AllergyType, DiningReview, Restaurant, ReviewStatus, User};
use crate::scoring::calculate_restaurant_scores;

const RECOMPUTE_MAX_RETRIES: u8 = 3;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn recompute_once(&self, restaurant_id: i64) -> Result<Option<Restaurant>> {
        let mut tx = self.pool.begin().await?;

        if read_ops::lock_restaurant_for_update(&mut *tx, restaurant_id)
            .await?
            .is_none()
        {
            debug!("Restaurant {} no longer exists, skipping recompute", restaurant_id);
            return Ok(None);
        }

        let approved =
            read_ops::find_reviews_by_restaurant_and_status(&mut *tx, restaurant_id, ReviewStatus::Approved)
                .await?;

        let Some(scores) = calculate_restaurant_scores(&approved) else {
            debug!("No approved reviews for restaurant {}", restaurant_id);
            return Ok(None);
        };

        let updated = write_ops::update_restaurant_scores(&mut *tx, restaurant_id, &scores).await?;

        tx.commit().await?;

        info!(
            restaurant_id = restaurant_id,
            approved_reviews = approved.len(),
            "Recomputed restaurant scores"
        );
        Ok(Some(updated))
    }
}

#[async_trait]
impl DiningStore for PgStore {
    async fn find_user_by_display_name(&self, display_name: &str) -> Result<Option<User>> {
        read_ops::find_user_by_display_name(&self.pool, display_name).await
    }

    async fn save_user(&self, user: User) -> Result<User> {
        if user.id == 0 {
            write_ops::insert_user(&self.pool, &user).await
        } else {
            write_ops::update_user(&self.pool, &user).await
        }
    }

    async fn find_restaurant_by_id(&self, restaurant_id: i64) -> Result<Option<Restaurant>> {
        read_ops::find_restaurant_by_id(&self.pool, restaurant_id).await
    }

    async fn find_restaurant_by_name_and_zip_code(
        &self,
        name: &str,
        zip_code: &str,
    ) -> Result<Option<Restaurant>> {
        read_ops::find_restaurant_by_name_and_zip_code(&self.pool, name, zip_code).await
    }

    async fn find_restaurants_by_zip_and_score_not_null(
        &self,
        zip_code: &str,
        allergy: AllergyType,
    ) -> Result<Vec<Restaurant>> {
        read_ops::find_restaurants_by_zip_and_score_not_null(&self.pool, zip_code, allergy).await
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        read_ops::list_restaurants(&self.pool).await
    }

    async fn save_restaurant(&self, restaurant: Restaurant) -> Result<Restaurant> {
        if restaurant.id == 0 {
            write_ops::insert_restaurant(&self.pool, &restaurant).await
        } else {
            write_ops::update_restaurant(&self.pool, &restaurant).await
        }
    }

    async fn find_review_by_id(&self, review_id: i64) -> Result<Option<DiningReview>> {
        read_ops::find_review_by_id(&self.pool, review_id).await
    }

    async fn find_reviews_by_restaurant_and_status(
        &self,
        restaurant_id: i64,
        status: ReviewStatus,
    ) -> Result<Vec<DiningReview>> {
        read_ops::find_reviews_by_restaurant_and_status(&self.pool, restaurant_id, status).await
    }

    async fn find_reviews_by_status(&self, status: ReviewStatus) -> Result<Vec<DiningReview>> {
        read_ops::find_reviews_by_status(&self.pool, status).await
    }

    async fn find_reviews_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<DiningReview>> {
        read_ops::find_reviews_by_restaurant(&self.pool, restaurant_id).await
    }

    async fn save_review(&self, review: DiningReview) -> Result<DiningReview> {
        if review.id == 0 {
            write_ops::insert_review(&self.pool, &review).await
        } else {
            write_ops::update_review(&self.pool, &review).await
        }
    }

    async fn recompute_restaurant_scores(&self, restaurant_id: i64) -> Result<Option<Restaurant>> {
        with_retry(RECOMPUTE_MAX_RETRIES, || self.recompute_once(restaurant_id)).await
    }

    async fn health_check(&self) -> Result<()> {
        ping(&self.pool).await
    }
}
