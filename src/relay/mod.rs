//! Streaming relay
//!
//! Turns a client conversation into a finite stream of [`StreamEvent`]s:
//! route the latest user message, either refuse in a single event or call
//! the completion provider under the chosen persona, and translate its
//! incremental output and failures into events.

mod event;
mod pipeline;

pub use event::{encode_frame, escape_payload, StreamEvent};
pub use pipeline::{
    Relay, RelayStream, AUTH_ERROR_PREFIX, DEFAULT_TEMPERATURE, GENERIC_ERROR_PREFIX,
    INIT_ERROR_MESSAGE,
};
