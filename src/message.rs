//! Wire types exchanged with the message store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessage {
    /// Message text.
    pub text: String,
}

impl PostMessage {
    /// Create a post body for `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A stored message as returned by `GET /messages`.
///
/// Only `text` is required. The store adds an id and a timestamp which are
/// kept verbatim, whatever their JSON type; anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Message text.
    pub text: String,
    /// Store-assigned timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

impl Message {
    /// A message carrying only text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            timestamp: None,
        }
    }
}

/// Body of `GET /messages/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCount {
    /// Total number of stored messages.
    #[serde(rename = "int")]
    pub count: i64,
}

/// Decode a `GET /messages` body.
///
/// An empty store may answer `null` instead of `[]`; both decode to an empty
/// list.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the body is neither `null` nor an array
/// of objects with a string `text` field.
pub fn decode_messages(body: &[u8]) -> Result<Vec<Message>, serde_json::Error> {
    let messages: Option<Vec<Message>> = serde_json::from_slice(body)?;
    Ok(messages.unwrap_or_default())
}
