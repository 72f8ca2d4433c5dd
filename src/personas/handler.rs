//! HTTP handler for the Personas API
//!
//! - GET /api/personas — list the persona catalog (without instruction text)

use crate::personas::registry::PersonaRegistry;
use crate::personas::types::PersonaSummary;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

/// Shared state for persona handlers
#[derive(Clone)]
pub struct PersonasState {
    pub registry: Arc<PersonaRegistry>,
}

/// Create the personas router
pub fn personas_router(state: PersonasState) -> Router {
    Router::new()
        .route("/api/personas", get(list_personas))
        .with_state(state)
}

/// GET /api/personas
async fn list_personas(State(state): State<PersonasState>) -> impl IntoResponse {
    let personas: Vec<PersonaSummary> = state
        .registry
        .all()
        .iter()
        .map(PersonaSummary::from)
        .collect();
    Json(personas)
}
