pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

/// Build the API router for the given state.
///
/// Everything except `/health`, sign-up and sign-in sits behind the
/// bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Account routes
        .route("/api/auth/sign-out", post(routes::auth::sign_out))
        .route("/api/auth/me", get(routes::auth::me))
        // Batch routes
        .route(
            "/api/batches",
            get(routes::batches::list).post(routes::batches::create),
        )
        .route(
            "/api/batches/{id}",
            get(routes::batches::get)
                .patch(routes::batches::update)
                .delete(routes::batches::delete),
        )
        .route("/api/batches/{id}/progress", get(routes::batches::progress))
        // Subject routes
        .route(
            "/api/batches/{id}/subjects",
            get(routes::subjects::list).post(routes::subjects::create),
        )
        .route(
            "/api/subjects/{id}",
            patch(routes::subjects::update).delete(routes::subjects::delete),
        )
        // Chapter routes
        .route(
            "/api/subjects/{id}/chapters",
            get(routes::chapters::list).post(routes::chapters::create),
        )
        .route(
            "/api/chapters/{id}",
            patch(routes::chapters::update).delete(routes::chapters::delete),
        )
        .route("/api/chapters/{id}/progress", get(routes::chapters::progress))
        // Content item routes
        .route(
            "/api/chapters/{id}/items",
            get(routes::items::list).post(routes::items::create_bulk),
        )
        .route(
            "/api/items/{id}",
            patch(routes::items::update).delete(routes::items::delete),
        )
        .route("/api/items/{id}/status", put(routes::items::set_status))
        // Target routes
        .route(
            "/api/chapters/{id}/targets",
            get(routes::targets::list).post(routes::targets::create),
        )
        .route(
            "/api/targets/{id}/progress",
            put(routes::targets::update_progress),
        )
        .route(
            "/api/targets/{id}",
            delete(routes::targets::delete),
        )
        // Batch goal routes
        .route(
            "/api/batches/{id}/tasks",
            get(routes::batch_goals::list_tasks).post(routes::batch_goals::create_task),
        )
        .route(
            "/api/batch-tasks/{id}/toggle",
            post(routes::batch_goals::toggle_task),
        )
        .route(
            "/api/batch-tasks/{id}",
            delete(routes::batch_goals::delete_task),
        )
        .route(
            "/api/batches/{id}/targets",
            get(routes::batch_goals::list_targets).post(routes::batch_goals::create_target),
        )
        .route(
            "/api/batch-targets/{id}",
            delete(routes::batch_goals::delete_target),
        )
        .route(
            "/api/batches/{id}/target-percentage",
            put(routes::batch_goals::set_target_percentage),
        )
        // Schedule routes
        .route("/api/schedule/options", get(routes::schedule::options))
        .route(
            "/api/schedule",
            get(routes::schedule::list).post(routes::schedule::create),
        )
        .route("/api/schedule/overview", get(routes::schedule::overview))
        .route("/api/schedule/{id}/toggle", post(routes::schedule::toggle))
        .route(
            "/api/schedule/{id}",
            delete(routes::schedule::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/sign-up", post(routes::auth::sign_up))
        .route("/api/auth/sign-in", post(routes::auth::sign_in))
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let addr = config.bind_addr();
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
