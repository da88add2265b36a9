//! Views that rendered entries are appended to.
//!
//! DESIGN
//! ======
//! `ChatView` is the seam between the session and presentation. The session
//! renders each inbound frame once and hands the entry to the view, then asks
//! it to scroll with the configured strategy. Views never reorder or drop
//! entries.
//!
//! - `MessageList` keeps the element tree of the `#chat-history` container
//!   and records scroll state, so tests can assert on what a page would show.
//! - `TerminalView` prints one line per entry for interactive use.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::borrow::Cow;
use std::io::Write;

use colored::Colorize;
use tracing::warn;

use crate::color::parse_css_color;
use crate::render::{Element, Layout, RenderedEntry, ScrollStrategy};

pub const CHAT_HISTORY_ID: &str = "chat-history";

pub trait ChatView {
    /// Append one entry at the end of the view.
    fn append(&mut self, entry: RenderedEntry);
    /// Reveal the newest entry according to `strategy`.
    fn scroll(&mut self, strategy: ScrollStrategy);
}

// =============================================================================
// MESSAGE LIST
// =============================================================================

/// Where the last scroll left the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Index of the entry the last scroll revealed.
    pub revealed: Option<usize>,
    pub last_strategy: Option<ScrollStrategy>,
    pub scrolls: usize,
}

/// In-memory model of the `#chat-history` container. Grows without bound.
#[derive(Clone, Debug)]
pub struct MessageList {
    layout: Layout,
    entries: Vec<RenderedEntry>,
    scroll: ScrollState,
}

impl MessageList {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self { layout, entries: Vec::new(), scroll: ScrollState::default() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[RenderedEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&RenderedEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    /// The container element. Bubble entries are list items and sit inside a
    /// `ul`; flat entries are direct children.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let container = Element::new("div").with_id(CHAT_HISTORY_ID).with_classes([CHAT_HISTORY_ID]);
        let items = self.entries.iter().map(|entry| entry.element.clone());
        match self.layout {
            Layout::Bubble => {
                let mut list = Element::new("ul");
                list.children.extend(items);
                container.with_child(list)
            }
            Layout::Flat => {
                let mut container = container;
                container.children.extend(items);
                container
            }
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_element().to_html()
    }
}

impl ChatView for MessageList {
    fn append(&mut self, entry: RenderedEntry) {
        self.entries.push(entry);
    }

    fn scroll(&mut self, strategy: ScrollStrategy) {
        if strategy == ScrollStrategy::None {
            return;
        }
        self.scroll = ScrollState {
            revealed: self.entries.len().checked_sub(1),
            last_strategy: Some(strategy),
            scrolls: self.scroll.scrolls.saturating_add(1),
        };
    }
}

// =============================================================================
// TERMINAL VIEW
// =============================================================================

/// Prints each entry as one line: `[meta] body` for bubbles, a tinted body
/// for flat entries.
pub struct TerminalView<W: Write> {
    out: W,
    color: bool,
    lines: usize,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, color: true, lines: 0 }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn format_line(&self, entry: &RenderedEntry) -> String {
        let meta = printable(&entry.meta);
        let body = printable(&entry.body);
        match entry.layout {
            Layout::Bubble if self.color => format!("[{}] {body}", meta.dimmed()),
            Layout::Bubble => format!("[{meta}] {body}"),
            Layout::Flat => match parse_css_color(&entry.meta) {
                Some((r, g, b)) if self.color => body.truecolor(r, g, b).to_string(),
                _ => body.into_owned(),
            },
        }
    }
}

/// Peer text with control characters (other than tab) shown as escapes, so
/// a frame cannot drive the terminal.
fn printable(text: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c.is_control() && c != '\t';
    if !text.contains(is_unsafe) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_unsafe(c) {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

impl<W: Write> ChatView for TerminalView<W> {
    fn append(&mut self, entry: RenderedEntry) {
        let line = self.format_line(&entry);
        match writeln!(self.out, "{line}") {
            Ok(()) => self.lines = self.lines.saturating_add(1),
            Err(error) => warn!(error = %error, "terminal: write failed"),
        }
    }

    fn scroll(&mut self, strategy: ScrollStrategy) {
        if strategy == ScrollStrategy::None {
            return;
        }
        if let Err(error) = self.out.flush() {
            warn!(error = %error, "terminal: flush failed");
        }
    }
}
