use crate::app::ports::EventsProvider;
use crate::error::AppError;
use crate::pipeline::GenrePipeline;
use crate::types::Fetched;
use axum::{
    extract::Path,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<GenrePipeline>,
    pub events: Arc<dyn EventsProvider>,
}

impl AppState {
    pub fn new(pipeline: Arc<GenrePipeline>) -> Self {
        let events = pipeline.events_provider();
        Self { pipeline, events }
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_endpoint() -> Response {
    match crate::metrics::render() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

fn upstream_error(e: AppError) -> Response {
    warn!("Request failed: {}", e);
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

/// Ranked genre records for a metro area
async fn events_for_location(
    Extension(state): Extension<AppState>,
    Path(location_id): Path<String>,
) -> Response {
    match state.pipeline.run(&location_id).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => upstream_error(e),
    }
}

/// Location search, forwarded as-is. `null` when the provider had nothing.
async fn search_locations(
    Extension(state): Extension<AppState>,
    Path(name): Path<String>,
) -> Response {
    match state.events.search_locations(&name).await {
        Ok(Fetched::Data(body)) => Json(body).into_response(),
        Ok(Fetched::Empty) => Json(serde_json::Value::Null).into_response(),
        Err(e) => upstream_error(e),
    }
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/events/:location_id", get(events_for_location))
        .route("/locations/:name", get(search_locations))
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on port {}", port);

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
