// Request and response payloads for the HTTP API.
// Required fields are still `Option` so that missing values reach domain
// validation instead of failing JSON extraction.

use serde::{Deserialize, Serialize};

use super::entities::{DiningReview, User};

/// Registration payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub interested_in_peanut_allergies: Option<bool>,
    pub interested_in_dairy_allergies: Option<bool>,
    pub interested_in_egg_allergies: Option<bool>,
}

/// Sparse update of a user profile.
///
/// Blank strings and absent booleans leave the stored value alone. The
/// display name is the lookup key and cannot be changed through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub interested_in_peanut_allergies: Option<bool>,
    pub interested_in_dairy_allergies: Option<bool>,
    pub interested_in_egg_allergies: Option<bool>,
}

impl UserPatch {
    /// Merge this patch over `user`, returning the updated record.
    pub fn apply(self, user: User) -> User {
        User {
            city: non_blank(self.city).or(user.city),
            state: non_blank(self.state).or(user.state),
            zip_code: non_blank(self.zip_code).or(user.zip_code),
            interested_in_peanut_allergies: self
                .interested_in_peanut_allergies
                .or(user.interested_in_peanut_allergies),
            interested_in_dairy_allergies: self
                .interested_in_dairy_allergies
                .or(user.interested_in_dairy_allergies),
            interested_in_egg_allergies: self
                .interested_in_egg_allergies
                .or(user.interested_in_egg_allergies),
            ..user
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Public view of a user; the database id is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub interested_in_peanut_allergies: Option<bool>,
    pub interested_in_dairy_allergies: Option<bool>,
    pub interested_in_egg_allergies: Option<bool>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            display_name: user.display_name,
            city: user.city,
            state: user.state,
            zip_code: user.zip_code,
            interested_in_peanut_allergies: user.interested_in_peanut_allergies,
            interested_in_dairy_allergies: user.interested_in_dairy_allergies,
            interested_in_egg_allergies: user.interested_in_egg_allergies,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: Option<String>,
    pub zip_code: Option<String>,
}

/// Review submission payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub display_name: Option<String>,
    pub restaurant_id: Option<i64>,
    pub peanut_score: Option<i16>,
    pub dairy_score: Option<i16>,
    pub egg_score: Option<i16>,
    pub commentary: Option<String>,
}

/// Admin moderation decision
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReviewDecision {
    pub accepted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub zipcode: String,
    pub allergy: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReviewsResponse {
    pub pending_reviews: Vec<DiningReview>,
}
