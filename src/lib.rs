pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod models;
pub mod scoring;

// Re-export commonly used types
pub use models::{
    AllergyType, DiningReview, NewRestaurant, NewReview, NewUser, Restaurant, ReviewStatus, User,
    UserPatch,
};

pub use db::{DatabaseError, DiningStore, InMemoryStore, PgStore};

pub use domain::{DomainError, DomainResult};

pub use scoring::{calculate_restaurant_scores, RestaurantScores};
