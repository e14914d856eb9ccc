use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{DiningReview, Restaurant};

/// Published scores of a restaurant, each rounded to two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestaurantScores {
    pub peanut: Decimal,
    pub dairy: Decimal,
    pub egg: Decimal,
    pub overall: Decimal,
}

impl RestaurantScores {
    pub fn apply_to(&self, restaurant: &mut Restaurant) {
        restaurant.peanut_score = Some(self.peanut);
        restaurant.dairy_score = Some(self.dairy);
        restaurant.egg_score = Some(self.egg);
        restaurant.overall_score = Some(self.overall);
    }
}

/// Round to two decimal places, halves away from zero, always at scale 2
pub fn round_score(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Calculate a restaurant's scores from its approved reviews
///
/// * category score = sum of that category / number of reviews
/// * overall score = (peanut sum + dairy sum + egg sum) / 3
///
/// The overall score is divided by the number of categories, not by the
/// number of reviews, so it grows with review volume. A category missing
/// from a review contributes 0 to its sum while the review still counts.
///
/// Returns `None` for an empty review set so callers leave existing scores
/// untouched.
pub fn calculate_restaurant_scores(approved_reviews: &[DiningReview]) -> Option<RestaurantScores> {
    if approved_reviews.is_empty() {
        return None;
    }

    let mut peanut_total = Decimal::ZERO;
    let mut dairy_total = Decimal::ZERO;
    let mut egg_total = Decimal::ZERO;

    for review in approved_reviews {
        peanut_total += Decimal::from(review.peanut_score.unwrap_or(0));
        dairy_total += Decimal::from(review.dairy_score.unwrap_or(0));
        egg_total += Decimal::from(review.egg_score.unwrap_or(0));
    }

    let review_count = Decimal::from(approved_reviews.len());
    let overall_total = peanut_total + dairy_total + egg_total;

    Some(RestaurantScores {
        peanut: round_score(peanut_total / review_count),
        dairy: round_score(dairy_total / review_count),
        egg: round_score(egg_total / review_count),
        overall: round_score(overall_total / Decimal::from(3)),
    })
}
