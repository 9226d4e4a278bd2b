//! HTTP surface: router assembly and server lifecycle.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::jwt_auth_middleware;
use crate::config::ServerConfig;
use state::AppState;

/// Browser origins allowed to call the API; unparsable entries are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // ==========================================================================
    // Public Routes (no auth required)
    // ==========================================================================
    let mut public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/login", post(crate::auth::handlers::login))
        .route(
            "/questions",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route("/questions/{id}", get(handlers::get_question));

    // Admin bootstrap over HTTP is opt-in; the create_admin binary is the
    // normal path.
    if state.allow_admin_bootstrap {
        tracing::warn!("POST /api/auth/create-admin is enabled");
        public_routes = public_routes.route(
            "/auth/create-admin",
            post(crate::auth::handlers::create_admin),
        );
    }

    // ==========================================================================
    // Admin Routes - Protected by JWT
    // ==========================================================================
    let admin_routes = Router::new()
        .route("/questions/{id}/answers", post(handlers::create_answer))
        .route(
            "/questions/{id}",
            axum::routing::delete(handlers::delete_question),
        )
        .route(
            "/answers/{id}",
            put(handlers::update_answer).delete(handlers::delete_answer),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .fallback(handlers::not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

/// Start HTTP server
pub async fn run_server(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} (port already in use?)", addr))?;

    tracing::info!("Q&A API listening on http://{}/api", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    serve(listener, app).await?;
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
