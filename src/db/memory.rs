//! In-memory implementation of `DiningStore`.
//!
//! All state is held in ordered maps behind a single `RwLock` and lost on
//! restart. Ids are assigned sequentially, so iteration order is insertion
//! order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::errors::{DatabaseError, Result};
use crate::db::store::DiningStore;
use crate::models::{AllergyType, DiningReview, Restaurant, ReviewStatus, User};
use crate::scoring::calculate_restaurant_scores;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    restaurants: BTreeMap<i64, Restaurant>,
    reviews: BTreeMap<i64, DiningReview>,
    next_user_id: i64,
    next_restaurant_id: i64,
    next_review_id: i64,
}

impl Tables {
    fn approved_reviews(&self, restaurant_id: i64) -> Vec<DiningReview> {
        self.reviews
            .values()
            .filter(|r| r.restaurant_id == restaurant_id && r.status == ReviewStatus::Approved)
            .cloned()
            .collect()
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiningStore for InMemoryStore {
    async fn find_user_by_display_name(&self, display_name: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.display_name == display_name)
            .cloned())
    }

    async fn save_user(&self, mut user: User) -> Result<User> {
        let mut tables = self.tables.write().await;

        let duplicate = tables
            .users
            .values()
            .any(|u| u.display_name == user.display_name && u.id != user.id);
        if duplicate {
            return Err(DatabaseError::IntegrityError(format!(
                "display_name '{}' already exists",
                user.display_name
            )));
        }

        if user.id == 0 {
            user.id = next_id(&mut tables.next_user_id);
        } else if !tables.users.contains_key(&user.id) {
            return Err(DatabaseError::NotFound(format!("User not found for id: {}", user.id)));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_restaurant_by_id(&self, restaurant_id: i64) -> Result<Option<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables.restaurants.get(&restaurant_id).cloned())
    }

    async fn find_restaurant_by_name_and_zip_code(
        &self,
        name: &str,
        zip_code: &str,
    ) -> Result<Option<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .restaurants
            .values()
            .find(|r| r.name == name && r.zip_code == zip_code)
            .cloned())
    }

    async fn find_restaurants_by_zip_and_score_not_null(
        &self,
        zip_code: &str,
        allergy: AllergyType,
    ) -> Result<Vec<Restaurant>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Restaurant> = tables
            .restaurants
            .values()
            .filter(|r| r.zip_code == zip_code && r.score_for(allergy).is_some())
            .cloned()
            .collect();

        // Stable sort keeps ascending id order among equal scores
        matches.sort_by(|a, b| b.score_for(allergy).cmp(&a.score_for(allergy)));
        Ok(matches)
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables.restaurants.values().cloned().collect())
    }

    async fn save_restaurant(&self, mut restaurant: Restaurant) -> Result<Restaurant> {
        let mut tables = self.tables.write().await;

        let duplicate = tables.restaurants.values().any(|r| {
            r.name == restaurant.name && r.zip_code == restaurant.zip_code && r.id != restaurant.id
        });
        if duplicate {
            return Err(DatabaseError::IntegrityError(format!(
                "restaurant '{}' already exists in {}",
                restaurant.name, restaurant.zip_code
            )));
        }

        if restaurant.id == 0 {
            restaurant.id = next_id(&mut tables.next_restaurant_id);
        } else if !tables.restaurants.contains_key(&restaurant.id) {
            return Err(DatabaseError::NotFound(format!(
                "Restaurant not found for id: {}",
                restaurant.id
            )));
        }

        tables.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn find_review_by_id(&self, review_id: i64) -> Result<Option<DiningReview>> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.get(&review_id).cloned())
    }

    async fn find_reviews_by_restaurant_and_status(
        &self,
        restaurant_id: i64,
        status: ReviewStatus,
    ) -> Result<Vec<DiningReview>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.restaurant_id == restaurant_id && r.status == status)
            .cloned()
            .collect())
    }

    async fn find_reviews_by_status(&self, status: ReviewStatus) -> Result<Vec<DiningReview>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn find_reviews_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<DiningReview>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn save_review(&self, mut review: DiningReview) -> Result<DiningReview> {
        let mut tables = self.tables.write().await;

        if !tables.restaurants.contains_key(&review.restaurant_id) {
            return Err(DatabaseError::MissingReference(format!(
                "restaurant {} does not exist",
                review.restaurant_id
            )));
        }

        if review.id == 0 {
            review.id = next_id(&mut tables.next_review_id);
            review.created_at = Utc::now();
        } else if !tables.reviews.contains_key(&review.id) {
            return Err(DatabaseError::NotFound(format!("Review not found for id: {}", review.id)));
        }

        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn recompute_restaurant_scores(&self, restaurant_id: i64) -> Result<Option<Restaurant>> {
        // Write lock held across read, compute and write
        let mut tables = self.tables.write().await;

        if !tables.restaurants.contains_key(&restaurant_id) {
            return Ok(None);
        }

        let approved = tables.approved_reviews(restaurant_id);
        let Some(scores) = calculate_restaurant_scores(&approved) else {
            return Ok(None);
        };

        let updated = tables
            .restaurants
            .get_mut(&restaurant_id)
            .map(|restaurant| {
                scores.apply_to(restaurant);
                restaurant.clone()
            });
        Ok(updated)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
