//! Gravitas - persona-routing streaming chat proxy
//!
//! Gravitas accepts a conversation from a chat client, picks one of a fixed
//! set of coaching personas for the latest user message, forwards the
//! conversation to an OpenAI-compatible completion provider under that
//! persona's instructions, and streams the generated text back as
//! server-sent events.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Gravitas Gateway                         │
//! │   POST /api/chat   GET /api/health   GET /api/personas        │
//! │                           │                                   │
//! │  ┌────────────────────────▼─────────────────────────────┐    │
//! │  │                   Streaming Relay                      │    │
//! │  │  - Extract latest user message                         │    │
//! │  │  - Refuse out-of-scope input without a provider call   │    │
//! │  │  - Prepend persona instructions, stream deltas         │    │
//! │  │  - Translate provider failures into a final event      │    │
//! │  └──────────────┬───────────────────────┬───────────────┘    │
//! │                 │                       │                     │
//! │  ┌──────────────▼─────────┐  ┌──────────▼───────────────┐    │
//! │  │     Intent Router      │  │   Completion Provider     │    │
//! │  │  ordered keyword rules │  │  OpenAI / Groq over SSE   │    │
//! │  └──────────────┬─────────┘  └──────────────────────────┘    │
//! │  ┌──────────────▼─────────┐                                   │
//! │  │   Persona Registry     │                                   │
//! │  └────────────────────────┘                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`gateway`]: HTTP server, chat and health handlers
//! - [`relay`]: Conversation to event-stream pipeline
//! - [`routing`]: Keyword-based intent routing
//! - [`personas`]: Persona catalog
//! - [`provider`]: Completion provider abstraction and OpenAI-compatible client
//! - [`conversation`]: Message types
//! - [`config`]: Configuration management

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod personas;
pub mod provider;
pub mod relay;
pub mod routing;

pub use config::GravitasConfig;
pub use error::{Error, Result};
