use sqlx::postgres::PgExecutor;
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::{AllergyType, DiningReview, Restaurant, ReviewStatus, User};

/// Look up a user by their unique display name
#[tracing::instrument(skip(executor))]
pub async fn find_user_by_display_name<'e, E>(
    executor: E,
    display_name: &str,
) -> Result<Option<User>>
where
    E: PgExecutor<'e>,
{
    debug!("Loading user by display name");

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            id,
            display_name,
            city,
            state,
            zip_code,
            interested_in_peanut_allergies,
            interested_in_dairy_allergies,
            interested_in_egg_allergies
        FROM users
        WHERE display_name = $1
        "#,
    )
    .bind(display_name)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(user)
}

#[tracing::instrument(skip(executor))]
pub async fn find_restaurant_by_id<'e, E>(executor: E, restaurant_id: i64) -> Result<Option<Restaurant>>
where
    E: PgExecutor<'e>,
{
    let restaurant = sqlx::query_as::<_, Restaurant>(
        r#"
        SELECT
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        FROM restaurants
        WHERE id = $1
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(restaurant)
}

/// Lock a restaurant row for the rest of the transaction.
///
/// Concurrent score recomputations for the same restaurant queue up behind
/// this lock, so each one reads the approved set committed by the last.
#[tracing::instrument(skip(executor))]
pub async fn lock_restaurant_for_update<'e, E>(
    executor: E,
    restaurant_id: i64,
) -> Result<Option<Restaurant>>
where
    E: PgExecutor<'e>,
{
    let restaurant = sqlx::query_as::<_, Restaurant>(
        r#"
        SELECT
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        FROM restaurants
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(restaurant_id)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(restaurant)
}

#[tracing::instrument(skip(executor))]
pub async fn find_restaurant_by_name_and_zip_code<'e, E>(
    executor: E,
    name: &str,
    zip_code: &str,
) -> Result<Option<Restaurant>>
where
    E: PgExecutor<'e>,
{
    let restaurant = sqlx::query_as::<_, Restaurant>(
        r#"
        SELECT
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        FROM restaurants
        WHERE name = $1
            AND zip_code = $2
        "#,
    )
    .bind(name)
    .bind(zip_code)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(restaurant)
}

/// Restaurants in a zip code with a published score for `allergy`, best first
#[tracing::instrument(skip(executor))]
pub async fn find_restaurants_by_zip_and_score_not_null<'e, E>(
    executor: E,
    zip_code: &str,
    allergy: AllergyType,
) -> Result<Vec<Restaurant>>
where
    E: PgExecutor<'e>,
{
    // The column comes from a closed enum, never from request input
    let sql = format!(
        r#"
        SELECT
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        FROM restaurants
        WHERE zip_code = $1
            AND {column} IS NOT NULL
        ORDER BY {column} DESC, id ASC
        "#,
        column = allergy.score_column()
    );

    let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(zip_code)
        .fetch_all(executor)
        .await
        .map_err(DatabaseError::QueryError)?;

    info!("Found {} scored restaurants in {}", restaurants.len(), zip_code);
    Ok(restaurants)
}

#[tracing::instrument(skip(executor))]
pub async fn list_restaurants<'e, E>(executor: E) -> Result<Vec<Restaurant>>
where
    E: PgExecutor<'e>,
{
    let restaurants = sqlx::query_as::<_, Restaurant>(
        r#"
        SELECT
            id,
            name,
            zip_code,
            peanut_score,
            dairy_score,
            egg_score,
            overall_score
        FROM restaurants
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(restaurants)
}

#[tracing::instrument(skip(executor))]
pub async fn find_review_by_id<'e, E>(executor: E, review_id: i64) -> Result<Option<DiningReview>>
where
    E: PgExecutor<'e>,
{
    let review = sqlx::query_as::<_, DiningReview>(
        r#"
        SELECT
            id,
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at
        FROM dining_reviews
        WHERE id = $1
        "#,
    )
    .bind(review_id)
    .fetch_optional(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(review)
}

#[tracing::instrument(skip(executor))]
pub async fn find_reviews_by_restaurant_and_status<'e, E>(
    executor: E,
    restaurant_id: i64,
    status: ReviewStatus,
) -> Result<Vec<DiningReview>>
where
    E: PgExecutor<'e>,
{
    let reviews = sqlx::query_as::<_, DiningReview>(
        r#"
        SELECT
            id,
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at
        FROM dining_reviews
        WHERE restaurant_id = $1
            AND status = $2
        ORDER BY id
        "#,
    )
    .bind(restaurant_id)
    .bind(status)
    .fetch_all(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    debug!("Loaded {} {} reviews", reviews.len(), status);
    Ok(reviews)
}

#[tracing::instrument(skip(executor))]
pub async fn find_reviews_by_status<'e, E>(executor: E, status: ReviewStatus) -> Result<Vec<DiningReview>>
where
    E: PgExecutor<'e>,
{
    let reviews = sqlx::query_as::<_, DiningReview>(
        r#"
        SELECT
            id,
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at
        FROM dining_reviews
        WHERE status = $1
        ORDER BY id
        "#,
    )
    .bind(status)
    .fetch_all(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(reviews)
}

#[tracing::instrument(skip(executor))]
pub async fn find_reviews_by_restaurant<'e, E>(executor: E, restaurant_id: i64) -> Result<Vec<DiningReview>>
where
    E: PgExecutor<'e>,
{
    let reviews = sqlx::query_as::<_, DiningReview>(
        r#"
        SELECT
            id,
            display_name,
            restaurant_id,
            peanut_score,
            dairy_score,
            egg_score,
            commentary,
            status,
            created_at
        FROM dining_reviews
        WHERE restaurant_id = $1
        ORDER BY id
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(reviews)
}
