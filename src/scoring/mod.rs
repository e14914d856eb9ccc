pub mod calculation;

pub use calculation::{calculate_restaurant_scores, round_score, RestaurantScores};
