use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// users table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub interested_in_peanut_allergies: Option<bool>,
    pub interested_in_dairy_allergies: Option<bool>,
    pub interested_in_egg_allergies: Option<bool>,
}

/// restaurants table
///
/// Scores stay `None` until the first review for the restaurant is approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub zip_code: String,
    pub peanut_score: Option<Decimal>,
    pub dairy_score: Option<Decimal>,
    pub egg_score: Option<Decimal>,
    pub overall_score: Option<Decimal>,
}

impl Restaurant {
    /// Published score for one allergy category
    pub fn score_for(&self, allergy: AllergyType) -> Option<Decimal> {
        match allergy {
            AllergyType::Peanut => self.peanut_score,
            AllergyType::Dairy => self.dairy_score,
            AllergyType::Egg => self.egg_score,
        }
    }
}

/// dining_reviews table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiningReview {
    pub id: i64,
    pub display_name: String,
    pub restaurant_id: i64,
    pub peanut_score: Option<i16>,
    pub dairy_score: Option<i16>,
    pub egg_score: Option<i16>,
    pub commentary: Option<String>,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

/// Moderation state of a review, stored as the `review_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "review_status", rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown review status: {0}")]
pub struct UnknownReviewStatus(pub String);

impl FromStr for ReviewStatus {
    type Err = UnknownReviewStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(UnknownReviewStatus(s.to_string())),
        }
    }
}

/// Allergen categories a restaurant is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergyType {
    Peanut,
    Dairy,
    Egg,
}

impl AllergyType {
    /// Column on `restaurants` holding this category's published score.
    pub fn score_column(&self) -> &'static str {
        match self {
            Self::Peanut => "peanut_score",
            Self::Dairy => "dairy_score",
            Self::Egg => "egg_score",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown allergy type: {0}")]
pub struct UnknownAllergyType(pub String);

impl FromStr for AllergyType {
    type Err = UnknownAllergyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peanut" => Ok(Self::Peanut),
            "dairy" => Ok(Self::Dairy),
            "egg" => Ok(Self::Egg),
            _ => Err(UnknownAllergyType(s.to_string())),
        }
    }
}
