//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod docs;
mod resource;

use crate::config::Settings;
use crate::models::{Advisor, Participant, Project, Resource};
use crate::state::SharedState;
use crate::store::Store;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{warn, Level};

/// Create the application router with all routes and middleware
pub fn create_router<S: Store>(state: SharedState<S>, settings: &Settings) -> Router {
    let cors = build_cors_layer(settings);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check::<S>))
        .nest(&mount_point::<Advisor>(), resource::router::<Advisor, S>())
        .nest(&mount_point::<Participant>(), resource::router::<Participant, S>())
        .nest(&mount_point::<Project>(), resource::router::<Project, S>())
        .merge(docs::swagger_ui())
        .layer(middleware)
        .with_state(state)
}

fn mount_point<R: Resource>() -> String {
    format!("/{}", R::TABLE)
}

/// Build CORS layer for the single configured origin
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    match settings.cors.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!(
                "⚠️  CORS_ORIGIN '{}' is not a valid header value, allowing any origin",
                settings.cors.allowed_origin
            );
            cors.allow_origin(Any)
        }
    }
}

async fn index() -> &'static str {
    "Hello, World!"
}

/// Health check endpoint
async fn health_check<S: Store>(State(state): State<SharedState<S>>) -> Json<serde_json::Value> {
    let database = match state.store.ping().await {
        Ok(()) => "up",
        Err(e) => {
            warn!("Health check could not reach the database: {}", e);
            "down"
        }
    };

    Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
