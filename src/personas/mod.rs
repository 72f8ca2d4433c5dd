//! Personas module — fixed mentor catalog
//!
//! Ships a closed set of mentor profiles, a council profile that speaks for
//! all mentors, and the scope guard whose text is returned verbatim for
//! out-of-scope questions. Also exposes a read-only listing endpoint.

pub mod handler;
pub mod registry;
pub mod types;

pub use handler::{personas_router, PersonasState};
pub use registry::{PersonaRegistry, DEFAULT_PERSONA, SCOPE_GUARD_MESSAGE};
pub use types::{PersonaId, PersonaProfile, PersonaSummary, ProfileKind};
