use axum::{
    routing::{get, post, put},
    Router,
};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::handlers::{
    add_restaurant_handler, create_user_handler, decide_review_handler, get_restaurant_handler,
    get_review_handler, get_user_handler, list_restaurants_handler, pending_reviews_handler,
    reviews_for_restaurant_handler, search_restaurants_handler, submit_review_handler,
    update_user_handler,
};
use crate::api::SharedStore;
use crate::config::{Config, OtelConfig, StoreBackend};
use crate::db::{create_pool, run_migrations, InMemoryStore, PgStore};

pub fn init_tracing(otel: &OtelConfig) {
    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn")),
        );

    if !otel.enabled {
        subscriber.init();
        return;
    }

    match init_opentelemetry(otel) {
        Ok(provider) => {
            opentelemetry::global::set_tracer_provider(provider.clone());

            // Tracer taken straight from the provider: the global BoxedTracer
            // does not implement PreSampledTracer
            let tracer = provider.tracer("dining-review");

            subscriber.with(OpenTelemetryLayer::new(tracer)).init();

            info!("OpenTelemetry enabled: {}", otel.endpoint);
        }
        Err(e) => {
            subscriber.init();
            tracing::error!("Failed to initialize OpenTelemetry: {}. Continuing with logs only.", e);
        }
    }
}

fn init_opentelemetry(otel: &OtelConfig) -> anyhow::Result<SdkTracerProvider> {
    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", otel.service_name.clone()))
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new("deployment.environment", otel.environment.clone()))
        .build();

    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(otel.endpoint.clone())
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(otel.sampling_rate))
        .with_batch_exporter(exporter)
        .build();

    info!("OpenTelemetry sampling rate: {}%", otel.sampling_rate * 100.0);

    Ok(provider)
}

/// Build the configured store, connecting and migrating when it is Postgres
pub async fn create_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

            let pool = create_pool(database_url, config.db_max_connections).await?;
            if config.run_migrations {
                run_migrations(&pool).await?;
            }

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// Routes for the whole HTTP surface over an existing store
pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        // Users
        .route("/api/users", post(create_user_handler))
        .route(
            "/api/users/{display_name}",
            get(get_user_handler).put(update_user_handler),
        )
        // Restaurants
        .route(
            "/api/restaurants",
            get(list_restaurants_handler).post(add_restaurant_handler),
        )
        .route("/api/restaurants/search", get(search_restaurants_handler))
        .route("/api/restaurants/{restaurant_id}", get(get_restaurant_handler))
        // Reviews
        .route("/api/reviews", post(submit_review_handler))
        .route("/api/reviews/{review_id}", get(get_review_handler))
        .route(
            "/api/reviews/restaurant/{restaurant_id}",
            get(reviews_for_restaurant_handler),
        )
        // Moderation
        .route("/api/admin/reviews/pending", get(pending_reviews_handler))
        .route("/api/admin/reviews/{review_id}", put(decide_review_handler))
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(store)
        // Add tracing layer for observability
        .layer(TraceLayer::new_for_http())
}

pub async fn create_app(config: &Config) -> anyhow::Result<Router> {
    let store = create_store(config).await?;
    Ok(create_router(store))
}

async fn health_check(
    axum::extract::State(store): axum::extract::State<SharedStore>,
) -> Result<&'static str, crate::api::ApiError> {
    store.health_check().await?;
    Ok("OK")
}

pub async fn run_server() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(&config.otel);

    info!("Starting dining review server");
    config.log_effective();

    // Set up ctrl-c handler for graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutting down gracefully...");
    };

    let app = create_app(&config).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
