//! Chat frame model and pipe-delimited text codec.
//!
//! This crate owns the wire representation shared by the `webchat` client and
//! any peer that speaks to it. A frame is one WebSocket text message of the
//! form `meta|body`: `meta` is display metadata (a timestamp, or a CSS color
//! for the flat layout) and `body` is the message text.
//!
//! The delimiter is never escaped. Splitting is unbounded but only the first
//! two fields carry meaning, so a body containing `|` is truncated at its
//! first `|`. The number of dropped fields is kept on the frame so callers
//! can log it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Field separator inside a text frame.
pub const DELIMITER: char = '|';

/// Layout of the metadata timestamp written by chat servers, e.g. `2024-03-09 07:05:00`.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Error returned by the strict decoder and the timestamp helper.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload contains no `|`, so there is no body field.
    #[error("frame has no `|` delimiter")]
    MissingDelimiter,
    /// The timestamp could not be formatted.
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// A single inbound chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFrame {
    /// `field[0]`: timestamp or color, depending on the sender.
    pub meta: String,
    /// `field[1]`, or `None` when the payload had no delimiter.
    pub body: Option<String>,
    /// Fields past the second one, dropped by the split.
    pub extra_fields: usize,
}

impl ChatFrame {
    /// Build a well-formed frame from metadata and body.
    #[must_use]
    pub fn new(meta: impl Into<String>, body: impl Into<String>) -> Self {
        Self { meta: meta.into(), body: Some(body.into()), extra_fields: 0 }
    }

    /// Body text, empty when the field was missing.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// True when the payload had fewer than two fields.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.body.is_none()
    }
}

/// Decode a text payload, never failing.
///
/// Missing fields decode as an empty `meta` or a `None` body. Every payload
/// maps to exactly one frame.
#[must_use]
pub fn decode_frame(text: &str) -> ChatFrame {
    let mut fields = text.split(DELIMITER);
    let meta = fields.next().unwrap_or_default().to_owned();
    let body = fields.next().map(ToOwned::to_owned);
    let extra_fields = fields.count();
    ChatFrame { meta, body, extra_fields }
}

/// Decode a text payload, rejecting payloads without a body field.
///
/// # Errors
///
/// Returns [`CodecError::MissingDelimiter`] when `text` contains no `|`.
pub fn decode_frame_strict(text: &str) -> Result<ChatFrame, CodecError> {
    let frame = decode_frame(text);
    if frame.is_malformed() {
        return Err(CodecError::MissingDelimiter);
    }
    Ok(frame)
}

/// Encode metadata and body into `meta|body`.
///
/// No escaping happens: a `|` inside either argument survives encoding and
/// shifts the fields on decode.
#[must_use]
pub fn encode_frame(meta: &str, body: &str) -> String {
    let mut out = String::with_capacity(meta.len() + body.len() + 1);
    out.push_str(meta);
    out.push(DELIMITER);
    out.push_str(body);
    out
}

/// Format `at` in the server timestamp layout, e.g. `2024-03-09 07:05:00`.
///
/// # Errors
///
/// Returns [`CodecError::Timestamp`] if the formatter rejects the value.
pub fn timestamp(at: OffsetDateTime) -> Result<String, CodecError> {
    Ok(at.format(TIMESTAMP_FORMAT)?)
}

/// Encode a body stamped with the current UTC time, as a chat server does.
///
/// # Errors
///
/// Returns [`CodecError::Timestamp`] if the current time cannot be formatted.
pub fn encode_timestamped(body: &str) -> Result<String, CodecError> {
    let meta = timestamp(OffsetDateTime::now_utc())?;
    Ok(encode_frame(&meta, body))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
