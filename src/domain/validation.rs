use super::{DomainError, DomainResult};
use crate::db::DiningStore;
use crate::models::{NewRestaurant, NewReview, NewUser};

const MIN_SCORE: i16 = 1;
const MAX_SCORE: i16 = 5;

/// True when `zip_code` is exactly five ASCII digits
pub fn is_valid_zip_code(zip_code: &str) -> bool {
    zip_code.len() == 5 && zip_code.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_zip_code(zip_code: &str) -> DomainResult<()> {
    if is_valid_zip_code(zip_code) {
        Ok(())
    } else {
        Err(DomainError::InvalidInput("Invalid zip code format".to_string()))
    }
}

/// Reject blank display names, returning the name otherwise
pub fn validate_display_name(display_name: Option<&str>) -> DomainResult<&str> {
    match display_name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(DomainError::InvalidInput("Display name cannot be empty".to_string())),
    }
}

/// Validate a registration: non-blank display name that nobody holds yet.
///
/// Only used on create; profile updates never re-check uniqueness.
pub async fn validate_new_user(store: &dyn DiningStore, user: &NewUser) -> DomainResult<()> {
    let display_name = validate_display_name(user.display_name.as_deref())?;

    if store.find_user_by_display_name(display_name).await?.is_some() {
        return Err(DomainError::Conflict("Display name already exists".to_string()));
    }

    Ok(())
}

pub async fn validate_new_restaurant(
    store: &dyn DiningStore,
    restaurant: &NewRestaurant,
) -> DomainResult<()> {
    let name = match restaurant.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(DomainError::InvalidInput(
                "Restaurant name cannot be empty".to_string(),
            ))
        }
    };

    let zip_code = restaurant.zip_code.as_deref().unwrap_or_default();
    validate_zip_code(zip_code)?;

    if store
        .find_restaurant_by_name_and_zip_code(name, zip_code)
        .await?
        .is_some()
    {
        return Err(DomainError::Conflict("Restaurant already exists".to_string()));
    }

    Ok(())
}

/// Field checks for a review submission that need no storage access
pub fn validate_review_fields(review: &NewReview) -> DomainResult<()> {
    let has_display_name = review
        .display_name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());
    if !has_display_name || review.restaurant_id.is_none() {
        return Err(DomainError::InvalidInput(
            "Display name and restaurant ID are required".to_string(),
        ));
    }

    let scores = [review.peanut_score, review.dairy_score, review.egg_score];
    if scores.iter().all(Option::is_none) {
        return Err(DomainError::InvalidInput(
            "At least one score must be provided".to_string(),
        ));
    }

    if scores
        .iter()
        .flatten()
        .any(|score| !(MIN_SCORE..=MAX_SCORE).contains(score))
    {
        return Err(DomainError::InvalidInput(format!(
            "Scores must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }

    Ok(())
}

/// Full review validation: required fields, then the referenced user and
/// restaurant must exist.
pub async fn validate_new_review(store: &dyn DiningStore, review: &NewReview) -> DomainResult<()> {
    validate_review_fields(review)?;

    let display_name = review.display_name.as_deref().unwrap_or_default();
    if store.find_user_by_display_name(display_name).await?.is_none() {
        return Err(DomainError::UnprocessableEntity("User not found".to_string()));
    }

    let restaurant_id = review.restaurant_id.unwrap_or_default();
    if store.find_restaurant_by_id(restaurant_id).await?.is_none() {
        return Err(DomainError::UnprocessableEntity("Restaurant not found".to_string()));
    }

    Ok(())
}
