use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub mod artifact_stream;

pub use artifact_stream::stream_artifact;

use crate::controllers::{generate::GenerateController, health};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// Build the application router with all routes and layers
pub fn build_router(config: &Config, generate_controller: Arc<GenerateController>) -> Router {
    let generate_routes = Router::new()
        .route("/generate", post(GenerateController::generate))
        .with_state(generate_controller)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    Router::new()
        .route("/health", get(health::health))
        .merge(generate_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// Turn a handler panic into the same plain-text 500 as any other failure
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("Internal server error: {}", detail),
    )
        .into_response()
}


/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    generate_controller: Arc<GenerateController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config, generate_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
