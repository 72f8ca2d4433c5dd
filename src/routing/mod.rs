//! Intent routing
//!
//! Deterministic, ordered keyword rules that pick a persona for the latest
//! user message or reject it as out of scope.

pub mod keywords;
mod router;

pub use router::{assess_relevance, classify, normalize, IntentRouter, Relevance, RoutingDecision};
