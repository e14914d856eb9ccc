use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::SharedStore;
use crate::domain;
use crate::models::{MessageResponse, NewRestaurant, Restaurant, SearchParams};

#[tracing::instrument(skip(store, payload))]
pub async fn add_restaurant_handler(
    State(store): State<SharedStore>,
    Json(payload): Json<NewRestaurant>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    info!("Processing new restaurant");

    let restaurant = domain::add_restaurant(store.as_ref(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id(
            "Restaurant added successfully",
            restaurant.id,
        )),
    ))
}

#[tracing::instrument(skip(store))]
pub async fn get_restaurant_handler(
    Path(restaurant_id): Path<i64>,
    State(store): State<SharedStore>,
) -> ApiResult<Json<Restaurant>> {
    let restaurant = domain::get_restaurant(store.as_ref(), restaurant_id).await?;
    Ok(Json(restaurant))
}

#[tracing::instrument(skip(store))]
pub async fn list_restaurants_handler(
    State(store): State<SharedStore>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let restaurants = domain::list_restaurants(store.as_ref()).await?;
    Ok(Json(restaurants))
}

#[tracing::instrument(skip(store), fields(zipcode = %params.zipcode, allergy = %params.allergy))]
pub async fn search_restaurants_handler(
    Query(params): Query<SearchParams>,
    State(store): State<SharedStore>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    info!("Processing restaurant search");

    let restaurants =
        domain::search_restaurants(store.as_ref(), &params.zipcode, &params.allergy).await?;

    Ok(Json(restaurants))
}
