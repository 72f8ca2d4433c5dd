//! Gateway server for Gravitas
//!
//! Exposes the streaming chat endpoint and health probe over HTTP and owns
//! the process-wide context they share.

mod handler;
mod server;
mod types;

pub use handler::{chat_router, ChatState};
pub use server::{Gateway, GatewayBuilder, GatewayStatus};
pub use types::{ApiError, ApiErrorDetail, ChatRequest, HealthResponse};
