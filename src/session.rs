//! Chat session: one connection, one view, one input.
//!
//! DESIGN
//! ======
//! `ChatSession` owns everything the page-level client used to keep in
//! globals: the connection handle, the message view and the input control.
//! Callers drive it explicitly:
//!
//! - `open` dials the endpoint (or `attach` adopts an existing connection).
//! - `process_next` waits for one inbound event and applies it; `run` loops
//!   until the connection closes.
//! - `submit` forwards the input as one text frame.
//! - `close` ends the connection; `dispose` also drops handlers and returns
//!   the view.
//!
//! LIFECYCLE
//! =========
//! Disconnected → Connected (`open`/`attach`) → Closed (`close`, `dispose`,
//! peer close or read error). Closed is terminal: there is no reconnect.
//!
//! Each inbound text frame yields exactly one rendered entry, appended and
//! scrolled before message handlers run, in delivery order.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use frames::ChatFrame;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::input::{InputField, SubmitOutcome};
use crate::render::{RenderConfig, Renderer};
use crate::transport::{self, CloseReason, Connection, TransportEvent};
use crate::view::ChatView;

type MessageHandler = Box<dyn FnMut(&ChatFrame) + Send>;
type CloseHandler = Box<dyn FnMut(&CloseReason) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    Closed,
}

pub struct ChatSession<V: ChatView> {
    id: Uuid,
    renderer: Renderer,
    view: V,
    input: InputField,
    connection: Option<Connection>,
    state: SessionState,
    message_handlers: Vec<MessageHandler>,
    close_handlers: Vec<CloseHandler>,
}

impl<V: ChatView> ChatSession<V> {
    pub fn new(config: RenderConfig, view: V) -> Self {
        Self {
            id: Uuid::new_v4(),
            renderer: Renderer::new(config),
            view,
            input: InputField::new(),
            connection: None,
            state: SessionState::Disconnected,
            message_handlers: Vec::new(),
            close_handlers: Vec::new(),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputField {
        &mut self.input
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Run `handler` for every inbound frame, after its entry is rendered.
    pub fn on_message(&mut self, handler: impl FnMut(&ChatFrame) + Send + 'static) {
        self.message_handlers.push(Box::new(handler));
    }

    /// Run `handler` once when the connection closes.
    pub fn on_close(&mut self, handler: impl FnMut(&CloseReason) + Send + 'static) {
        self.close_handlers.push(Box::new(handler));
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Dial `url` and enter the connected state. No retry on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyOpened`] unless the session is still
    /// disconnected, or the connect error of [`transport::connect`].
    pub async fn open(&mut self, url: &str) -> Result<(), ClientError> {
        if self.state != SessionState::Disconnected {
            return Err(ClientError::AlreadyOpened);
        }
        let connection = match transport::connect(url).await {
            Ok(connection) => connection,
            Err(error) => {
                warn!(session_id = %self.id, %url, error = %error, "session: open failed");
                return Err(error);
            }
        };
        self.attach(connection)
    }

    /// Adopt an already open connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyOpened`] unless the session is still
    /// disconnected.
    pub fn attach(&mut self, connection: Connection) -> Result<(), ClientError> {
        if self.state != SessionState::Disconnected {
            return Err(ClientError::AlreadyOpened);
        }
        self.connection = Some(connection);
        self.state = SessionState::Connected;
        info!(session_id = %self.id, "session: connected");
        Ok(())
    }

    /// Close the connection and notify close handlers. No-op unless connected.
    pub async fn close(&mut self) {
        if self.state != SessionState::Connected {
            return;
        }
        if let Some(mut connection) = self.connection.take() {
            connection.close().await;
        }
        self.finish(&CloseReason::ClientClosed);
    }

    /// Close, drop every handler, and hand back the view.
    pub async fn dispose(mut self) -> V {
        self.close().await;
        self.message_handlers.clear();
        self.close_handlers.clear();
        self.view
    }

    fn finish(&mut self, reason: &CloseReason) {
        self.connection = None;
        self.state = SessionState::Closed;
        info!(session_id = %self.id, ?reason, "session: closed");
        for handler in &mut self.close_handlers {
            handler(reason);
        }
    }

    // =========================================================================
    // RECEIVE
    // =========================================================================

    /// Wait for one inbound event and apply it. Returns `false` once the
    /// session is no longer connected. Cancel-safe.
    pub async fn process_next(&mut self) -> bool {
        let Some(connection) = self.connection.as_mut() else {
            return false;
        };
        match connection.next_event().await {
            TransportEvent::Text(text) => {
                self.receive(&text);
                true
            }
            TransportEvent::Closed(reason) => {
                self.finish(&reason);
                false
            }
        }
    }

    /// Process inbound events until the connection closes.
    pub async fn run(&mut self) {
        while self.process_next().await {}
    }

    /// Render one inbound text frame: split, build the entry, append, scroll,
    /// then notify message handlers.
    pub fn receive(&mut self, text: &str) {
        let frame = frames::decode_frame(text);
        if frame.is_malformed() {
            warn!(session_id = %self.id, "session: frame without delimiter, body left empty");
        } else if frame.extra_fields > 0 {
            debug!(session_id = %self.id, dropped = frame.extra_fields, "session: extra frame fields dropped");
        }

        let entry = self.renderer.render(&frame);
        self.view.append(entry);
        self.view.scroll(self.renderer.config().scroll);

        for handler in &mut self.message_handlers {
            handler(&frame);
        }
    }

    // =========================================================================
    // SEND
    // =========================================================================

    /// Submit the input control. Sends its raw text as one frame and clears
    /// it; does nothing when disconnected or when the input is empty.
    pub fn submit(&mut self) -> SubmitOutcome {
        let Some(connection) = self.connection.as_ref() else {
            debug!(session_id = %self.id, "session: submit without connection");
            return SubmitOutcome::NotConnected;
        };
        if self.input.is_empty() {
            return SubmitOutcome::EmptyInput;
        }
        if !connection.send_text(self.input.value().to_owned()) {
            debug!(session_id = %self.id, "session: submit on closed connection");
            return SubmitOutcome::NotConnected;
        }
        self.input.clear();
        SubmitOutcome::Sent
    }

    /// Put `text` in the input control and submit it.
    pub fn submit_text(&mut self, text: impl Into<String>) -> SubmitOutcome {
        self.input.set_value(text);
        self.submit()
    }
}
