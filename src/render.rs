//! Element tree and the configurable entry renderer.
//!
//! DESIGN
//! ======
//! A rendered entry is a small element tree (tag, id, classes, inline style,
//! text, children) rather than a live DOM node, so rendering can be tested
//! without a browser or a socket. `Element::to_html` serializes a tree with
//! text and attribute escaping; inbound text is always treated as text.
//!
//! One `Renderer` covers every layout. What used to differ between client
//! variants (entry shape, classes, scroll behavior) lives in `RenderConfig`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use frames::ChatFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// ELEMENT
// =============================================================================

/// A node in the rendered message tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: Option<String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the first element (self included) carrying `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_class(class))
    }

    /// Concatenated text of this element and its descendants, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Serialize to an HTML fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        if let Some(style) = &self.style {
            push_attr(out, "style", style);
        }
        out.push('>');
        out.push_str(&escape_html(&self.text));
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}

/// Escape `&`, `<`, `>`, `"` and `'` for text and attribute positions.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// RENDER CONFIG
// =============================================================================

/// Where the frame metadata goes in the rendered entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// List item with a time label row above a message bubble.
    Bubble,
    /// One flat block whose text color is the metadata field.
    Flat,
}

/// How the view reveals a newly appended entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollStrategy {
    /// Scroll the message list container into view.
    IntoView,
    /// Scroll the whole page to its bottom.
    PageBottom,
    /// Leave the scroll position alone.
    None,
}

/// Class names applied to each part of a rendered entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryClasses {
    pub item: Vec<String>,
    pub time_row: Vec<String>,
    pub time_label: Vec<String>,
    pub bubble: Vec<String>,
}

impl EntryClasses {
    /// Classes of the bubble layout: right-aligned "my-message" bubbles.
    #[must_use]
    pub fn bubble() -> Self {
        Self {
            item: strings(&["clearfix"]),
            time_row: strings(&["message-data", "text-right"]),
            time_label: strings(&["message-data-time"]),
            bubble: strings(&["message", "my-message", "float-right"]),
        }
    }

    /// The flat layout uses inline color only.
    #[must_use]
    pub fn flat() -> Self {
        Self::default()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Everything that distinguishes one rendering of a frame from another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub layout: Layout,
    pub classes: EntryClasses,
    pub scroll: ScrollStrategy,
}

impl RenderConfig {
    #[must_use]
    pub fn bubble() -> Self {
        Self { layout: Layout::Bubble, classes: EntryClasses::bubble(), scroll: ScrollStrategy::IntoView }
    }

    #[must_use]
    pub fn flat() -> Self {
        Self { layout: Layout::Flat, classes: EntryClasses::flat(), scroll: ScrollStrategy::PageBottom }
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollStrategy) -> Self {
        self.scroll = scroll;
        self
    }
}

// =============================================================================
// RENDERER
// =============================================================================

/// One rendered message: the decoded fields plus the element built from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEntry {
    pub layout: Layout,
    pub meta: String,
    pub body: String,
    pub element: Element,
}

#[derive(Clone, Debug)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Build exactly one entry for `frame`. A missing body renders empty.
    #[must_use]
    pub fn render(&self, frame: &ChatFrame) -> RenderedEntry {
        let meta = frame.meta.clone();
        let body = frame.body_text().to_owned();
        let element = match self.config.layout {
            Layout::Bubble => self.bubble_element(&meta, &body),
            Layout::Flat => self.flat_element(&meta, &body),
        };
        RenderedEntry { layout: self.config.layout, meta, body, element }
    }

    fn bubble_element(&self, meta: &str, body: &str) -> Element {
        let classes = &self.config.classes;
        let label = Element::new("span").with_classes(classes.time_label.iter().cloned()).with_text(meta);
        let time_row = Element::new("div").with_classes(classes.time_row.iter().cloned()).with_child(label);
        let bubble = Element::new("div").with_classes(classes.bubble.iter().cloned()).with_text(body);

        Element::new("li")
            .with_classes(classes.item.iter().cloned())
            .with_child(time_row)
            .with_child(bubble)
    }

    fn flat_element(&self, meta: &str, body: &str) -> Element {
        let element = Element::new("div").with_classes(self.config.classes.item.iter().cloned());
        let element = if is_color_value(meta) {
            element.with_style(format!("color: {meta}"))
        } else {
            debug!(%meta, "render: meta is not a color value, entry left unstyled");
            element
        };
        element.with_text(body)
    }
}

/// True when `meta` can only be a single CSS color value such as `#a1b2c3`
/// or `rgb(1, 2, 3)`. Characters that could end the declaration are refused.
fn is_color_value(meta: &str) -> bool {
    let meta = meta.trim();
    !meta.is_empty()
        && meta
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | '-' | ' ' | '/'))
}
