use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

use crate::db::errors::{DatabaseError, Result};

/// Create the connection pool used by the Postgres store
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(60))
        .connect(database_url)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Health check for the database connection
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    Ok(())
}

/// Execute a function with retry logic for handling transient errors
pub async fn with_retry<F, Fut, T>(max_retries: u8, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt: u8 = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                warn!(
                    attempt = attempt,
                    max_retries = max_retries,
                    error = %e,
                    "Retryable error occurred, retrying..."
                );

                // Exponential backoff, capped at one second
                let delay_ms = (50 * 2_u64.pow(u32::from(attempt) - 1)).min(1000);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(e) if e.is_retryable() => {
                return Err(DatabaseError::RetryLimitExceeded { attempts: max_retries });
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_logic() {
        let calls = AtomicU32::new(0);

        let result = with_retry(3, || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(DatabaseError::ConnectionError("test error".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_limit_exceeded() {
        let result: Result<()> = with_retry(2, || async {
            Err(DatabaseError::ConnectionError("test error".to_string()))
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            DatabaseError::RetryLimitExceeded { attempts: 2 }
        ));
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = with_retry(5, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DatabaseError::NotFound("restaurant 9".to_string())) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), DatabaseError::NotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
