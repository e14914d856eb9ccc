// API handlers - thin HTTP orchestration layer
// Handlers only deal with HTTP concerns:
// 1. Extract parameters from request
// 2. Call domain logic
// 3. Transform domain result to HTTP response

pub mod admin;
pub mod restaurants;
pub mod reviews;
pub mod users;

pub use admin::{decide_review_handler, pending_reviews_handler};
pub use restaurants::{
    add_restaurant_handler, get_restaurant_handler, list_restaurants_handler,
    search_restaurants_handler,
};
pub use reviews::{get_review_handler, reviews_for_restaurant_handler, submit_review_handler};
pub use users::{create_user_handler, get_user_handler, update_user_handler};
