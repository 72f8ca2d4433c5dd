//! Client-facing stream events and their wire framing

use bytes::Bytes;

/// One unit of text pushed to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub payload: String,
}

impl StreamEvent {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Encode as a `data: <payload>\n\n` frame
    pub fn to_frame(&self) -> Bytes {
        Bytes::from(encode_frame(&self.payload))
    }
}

/// Replace line breaks with their two-character escapes so a payload
/// always fits on one `data:` line
pub fn escape_payload(payload: &str) -> String {
    payload
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

pub fn encode_frame(payload: &str) -> String {
    format!("data: {}\n\n", escape_payload(payload))
}
