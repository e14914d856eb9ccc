use sqlx::postgres::PgExecutor;
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::{DiningReview, Restaurant, User};
use crate::scoring::RestaurantScores;

/// Insert a new user, returning the stored row with its assigned id
pub async fn insert_user<'e, E>(executor: E, user: &User) -> Result<User>
where
    E: PgExecutor<'e>,
{
    debug!("Inserting user: {}", user.display_name);

    let stored = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (
            display_name,
            city,
            state,
            zip_code,
            interested_in_peanut_allergies,
            interested_in_dairy_allergies,
            interested_in_egg_allergies,
            created_at,
            updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        RETURNING
            id,
            display_name,
            city,
            state,
            zip_code,
            interested_in_peanut_allergies,
            interested_in_dairy_allergies,
            interested_in_egg_allergies
        "#,
    )
    .bind(&user.display_name)
    .bind(&user.city)
    .bind(&user.state)
    .bind(&user.zip_code)
    .bind(user.interested_in_peanut_allergies)
    .bind(user.interested_in_dairy_allergies)
    .bind(user.interested_in_egg_allergies)
    .fetch_one(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!("Inserted user with ID: {}", stored.id);
    Ok(stored)
}

pub async fn update_user<'e, E>(executor: E, user: &User) -> Result<User>
where
    E: PgExecutor<'e>,
{
    debug!("Updating user ID: {}", user.id);

    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            display_name = $2,
            city = $3,
            state = $4,
            zip_code = $5,
            interested_in_peanut_allergies = $6,
            interested_in_dairy_allergies = $7,
            interested_in_egg_allergies = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id,
            display_name,
            city,
            state,
            zip_code,
            interested_in_peanut_allergies,
            interested_in_dairy_allergies,
            interested_in_egg_allergies
        "#,
    )
    .bind(user.id)
    .bind(&user.display_name)
    .bind(&user.city)
    .bind(&user.state)
    .bind(&user.zip_code)
    .bind(user.interested_in_peanut_allergies)
    .bind(user.interested_in_dairy_allergies)
    .bind(user.interested_in_egg_allergies)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?
    .ok_or_else(|| DatabaseError::NotFound(format!("User not found for id: {}", user.id)))
}

pub async fn insert_restaurant<'e, E>(executor: E, restaurant: &Restaurant) -> Result<Restaurant>
where
    E: PgExecutor<'e>,
{
    debug!("Inserting restaurant: {} ({})", restaurant.name, restaurant.zip_code);

    let stored = sqlx::query_as::<_, Restaurant>(
        r#"
        INSERT INTO restaurants (
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score,
            created_at,
            updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        RETURNING
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        "#,
    )
    .bind(&restaurant.name)
    .bind(&restaurant.zip_code)
    .bind(restaurant.peanut_score)
    .bind(restaurant.dairy_score)
    .bind(restaurant.egg_score)
    .bind(restaurant.overall_score)
    .fetch_one(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!("Inserted restaurant with ID: {}", stored.id);
    Ok(stored)
}

pub async fn update_restaurant<'e, E>(executor: E, restaurant: &Restaurant) -> Result<Restaurant>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Restaurant>(
        r#"
        UPDATE restaurants
        SET
            name = $2,
            zip_code = $3,
            peanut_score = $4,
            dairy_score = $5,
            egg_score = $6,
            overall_score = $7,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        "#,
    )
    .bind(restaurant.id)
    .bind(&restaurant.name)
    .bind(&restaurant.zip_code)
    .bind(restaurant.peanut_score)
    .bind(restaurant.dairy_score)
    .bind(restaurant.egg_score)
    .bind(restaurant.overall_score)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?
    .ok_or_else(|| DatabaseError::NotFound(format!("Restaurant not found for id: {}", restaurant.id)))
}

/// Overwrite the four published scores of a restaurant
pub async fn update_restaurant_scores<'e, E>(
    executor: E,
    restaurant_id: i64,
    scores: &RestaurantScores,
) -> Result<Restaurant>
where
    E: PgExecutor<'e>,
{
    debug!("Writing recomputed scores for restaurant ID: {}", restaurant_id);

    sqlx::query_as::<_, Restaurant>(
        r#"
        UPDATE restaurants
        SET
            peanut_score = $2,
            dairy_score = $3,
            egg_score = $4,
            overall_score = $5,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        "#,
    )
    .bind(restaurant_id)
    .bind(scores.peanut)
    .bind(scores.dairy)
    .bind(scores.egg)
    .bind(scores.overall)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?
    .ok_or_else(|| DatabaseError::NotFound(format!("Restaurant not found for id: {}", restaurant_id)))
}

pub async fn insert_review<'e, E>(executor: E, review: &DiningReview) -> Result<DiningReview>
where
    E: PgExecutor<'e>,
{
    debug!(
        "Inserting review by {} for restaurant ID: {}",
        review.display_name, review.restaurant_id
    );

    let stored = sqlx::query_as::<_, DiningReview>(
        r#"
        INSERT INTO dining_reviews (
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at,
            updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        RETURNING
            id,
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at
        "#,
    )
    .bind(&review.display_name)
    .bind(review.restaurant_id)
    .bind(review.peanut_score)
    .bind(review.dairy_score)
    .bind(review.egg_score)
    .bind(&review.commentary)
    .bind(review.status)
    .fetch_one(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!("Inserted review with ID: {}", stored.id);
    Ok(stored)
}

pub async fn update_review<'e, E>(executor: E, review: &DiningReview) -> Result<DiningReview>
where
    E: PgExecutor<'e>,
{
    debug!("Updating review ID: {} to status {}", review.id, review.status);

    sqlx::query_as::<_, DiningReview>(
        r#"
        UPDATE dining_reviews
        SET
            display_name = $2,
            restaurant_id = $3,
            peanut_score = $4,
            dairy_score = $5,
            egg_score = $6,
            commentary = $7,
            status = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id,
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at
        "#,
    )
    .bind(review.id)
    .bind(&review.display_name)
    .bind(review.restaurant_id)
    .bind(review.peanut_score)
    .bind(review.dairy_score)
    .bind(review.egg_score)
    .bind(&review.commentary)
    .bind(review.status)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?
    .ok_or_else(|| DatabaseError::NotFound(format!("Review not found for id: {}", review.id)))
}
