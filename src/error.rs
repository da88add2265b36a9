//! Client error type.

/// Errors surfaced by the chat client.
///
/// Submission never produces one of these: an absent connection or empty
/// input is reported through [`crate::input::SubmitOutcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid websocket url: {0}")]
    InvalidUrl(String),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("session already opened")]
    AlreadyOpened,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
