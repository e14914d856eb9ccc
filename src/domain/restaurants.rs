use tracing::info;

use super::validation::{validate_new_restaurant, validate_zip_code};
use super::{DomainError, DomainResult};
use crate::db::DiningStore;
use crate::models::{AllergyType, NewRestaurant, Restaurant};

/// Add a restaurant; scores start unset
#[tracing::instrument(skip(store, new_restaurant), fields(name = ?new_restaurant.name))]
pub async fn add_restaurant(
    store: &dyn DiningStore,
    new_restaurant: NewRestaurant,
) -> DomainResult<Restaurant> {
    validate_new_restaurant(store, &new_restaurant).await?;

    let restaurant = Restaurant {
        id: 0,
        name: new_restaurant.name.unwrap_or_default(),
        zip_code: new_restaurant.zip_code.unwrap_or_default(),
        peanut_score: None,
        dairy_score: None,
        egg_score: None,
        overall_score: None,
    };

    let stored = store.save_restaurant(restaurant).await?;
    info!(restaurant_id = stored.id, "Restaurant added");
    Ok(stored)
}

#[tracing::instrument(skip(store))]
pub async fn get_restaurant(store: &dyn DiningStore, restaurant_id: i64) -> DomainResult<Restaurant> {
    store
        .find_restaurant_by_id(restaurant_id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Restaurant not found".to_string()))
}

pub async fn list_restaurants(store: &dyn DiningStore) -> DomainResult<Vec<Restaurant>> {
    Ok(store.list_restaurants().await?)
}

/// Scored restaurants in a zip code for one allergy, best score first
#[tracing::instrument(skip(store))]
pub async fn search_restaurants(
    store: &dyn DiningStore,
    zip_code: &str,
    allergy: &str,
) -> DomainResult<Vec<Restaurant>> {
    validate_zip_code(zip_code)?;
    let allergy: AllergyType = allergy
        .parse()
        .map_err(|_| DomainError::InvalidInput("Invalid allergy type".to_string()))?;

    let restaurants = store
        .find_restaurants_by_zip_and_score_not_null(zip_code, allergy)
        .await?;

    info!(results = restaurants.len(), "Restaurant search complete");
    Ok(restaurants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_restaurant(name: &str, zip_code: &str) -> NewRestaurant {
        NewRestaurant {
            name: Some(name.to_string()),
            zip_code: Some(zip_code.to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_restaurant_starts_unscored() {
        let store = crate::db::InMemoryStore::new();

        let restaurant = add_restaurant(&store, new_restaurant("Clover", "02139"))
            .await
            .unwrap();

        assert!(restaurant.id > 0);
        assert_eq!(restaurant.peanut_score, None);
        assert_eq!(restaurant.overall_score, None);
        assert_eq!(get_restaurant(&store, restaurant.id).await.unwrap(), restaurant);
    }

    #[tokio::test]
    async fn test_add_restaurant_validation() {
        let store = crate::db::InMemoryStore::new();
        add_restaurant(&store, new_restaurant("Clover", "02139")).await.unwrap();

        for (name, zip) in [("Clover", "0213"), ("Clover", "abcdef"), ("", "02139"), ("  ", "02139")] {
            let err = add_restaurant(&store, new_restaurant(name, zip)).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)), "{name:?} {zip:?}");
        }

        let err = add_restaurant(&store, NewRestaurant::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let err = add_restaurant(&store, new_restaurant("Clover", "02139"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Same name in another zip code is a different restaurant
        assert!(add_restaurant(&store, new_restaurant("Clover", "02140")).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_unknown_restaurant_is_not_found() {
        let store = crate::db::InMemoryStore::new();
        let err = get_restaurant(&store, 5).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_filters_and_orders() {
        let store = crate::db::InMemoryStore::new();
        let low = add_restaurant(&store, new_restaurant("Low", "02139")).await.unwrap();
        let high = add_restaurant(&store, new_restaurant("High", "02139")).await.unwrap();
        add_restaurant(&store, new_restaurant("Unscored", "02139")).await.unwrap();
        let other_zip = add_restaurant(&store, new_restaurant("Far", "94110")).await.unwrap();

        for (restaurant, score) in [(low, dec!(2.50)), (high, dec!(4.75)), (other_zip, dec!(5.00))] {
            store
                .save_restaurant(Restaurant {
                    peanut_score: Some(score),
                    ..restaurant
                })
                .await
                .unwrap();
        }

        let found = search_restaurants(&store, "02139", "PEANUT").await.unwrap();
        let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);

        assert!(search_restaurants(&store, "02139", "egg").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_bad_input() {
        let store = crate::db::InMemoryStore::new();

        let err = search_restaurants(&store, "2139", "peanut").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let err = search_restaurants(&store, "02139", "gluten").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
