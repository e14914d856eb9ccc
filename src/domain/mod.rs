// Domain layer - business rules with no HTTP concerns
// Every operation takes the store as `&dyn DiningStore` so handlers and tests
// can plug in either backend.

pub mod moderation;
pub mod restaurants;
pub mod reviews;
pub mod users;
pub mod validation;

use crate::db::DatabaseError;

// Domain error type - no HTTP concerns
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DatabaseError> for DomainError {
    fn from(e: DatabaseError) -> Self {
        if e.is_unique_violation() {
            return DomainError::Conflict(e.to_string());
        }
        if e.is_missing_reference() {
            return DomainError::UnprocessableEntity(e.to_string());
        }
        match e {
            DatabaseError::NotFound(msg) => DomainError::NotFound(msg),
            other => DomainError::Database(other.to_string()),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

pub use moderation::{decide_review, pending_reviews};
pub use restaurants::{add_restaurant, get_restaurant, list_restaurants, search_restaurants};
pub use reviews::{get_review, list_reviews_for_restaurant, submit_review};
pub use users::{create_user, get_user, update_user};
