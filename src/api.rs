//! Unified API router for Gravitas
//!
//! Merges the module routers into a single axum `Router` with CORS, request
//! tracing and optional static file serving.
//!
//! ## Endpoint Map
//!
//! | Path             | Module   | Description                       |
//! |------------------|----------|-----------------------------------|
//! | `/api/chat`      | gateway  | Persona-routed streaming chat     |
//! | `/api/health`    | gateway  | Provider client status            |
//! | `/api/personas`  | personas | Persona catalog                   |
//! | `/*`             | static   | Chat page assets (when configured)|

use crate::config::ServerConfig;
use crate::gateway::{chat_router, ChatState};
use crate::personas::{personas_router, PersonasState};
use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the complete Gravitas HTTP application
pub fn build_app(
    chat_state: ChatState,
    personas_state: PersonasState,
    server: &ServerConfig,
) -> Router {
    let cors = build_cors(&server.cors_origins);

    let app = Router::new()
        .merge(chat_router(chat_state))
        .merge(personas_router(personas_state));

    let app = match &server.static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static files");
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}
