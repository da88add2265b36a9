//! WebSocket chat client.
//!
//! Opens one WebSocket to a chat endpoint, renders each inbound `meta|body`
//! frame as one entry in a message view, and forwards submitted input as one
//! text frame. See [`session::ChatSession`] for the lifecycle.

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod transport;
pub mod view;

pub use config::{ClientConfig, Endpoint, Variant};
pub use error::ClientError;
pub use input::{InputField, SubmitOutcome};
pub use render::{Element, Layout, RenderConfig, RenderedEntry, Renderer, ScrollStrategy};
pub use session::{ChatSession, SessionState};
pub use transport::{CloseReason, Connection, TransportEvent};
pub use view::{ChatView, MessageList, TerminalView};
