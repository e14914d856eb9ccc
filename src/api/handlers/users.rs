use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::SharedStore;
use crate::domain;
use crate::models::{MessageResponse, NewUser, UserPatch, UserProfile};

#[tracing::instrument(skip(store, payload))]
pub async fn create_user_handler(
    State(store): State<SharedStore>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    info!("Processing user registration");

    domain::create_user(store.as_ref(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User profile created successfully")),
    ))
}

#[tracing::instrument(skip(store))]
pub async fn get_user_handler(
    Path(display_name): Path<String>,
    State(store): State<SharedStore>,
) -> ApiResult<Json<UserProfile>> {
    let profile = domain::get_user(store.as_ref(), &display_name).await?;
    Ok(Json(profile))
}

#[tracing::instrument(skip(store, patch))]
pub async fn update_user_handler(
    Path(display_name): Path<String>,
    State(store): State<SharedStore>,
    Json(patch): Json<UserPatch>,
) -> ApiResult<StatusCode> {
    info!("Processing user profile update");

    domain::update_user(store.as_ref(), &display_name, patch).await?;

    Ok(StatusCode::NO_CONTENT)
}
