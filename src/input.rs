//! The message input control and the outcome of submitting it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

/// Model of the `#inputMessage` text input of the `#inputForm` form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
}

impl InputField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Literal emptiness. Whitespace-only input counts as content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// What a form submission did. Submission never fails; default form
/// navigation is suppressed in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// One text frame was queued and the input cleared.
    Sent,
    /// Nothing to send; input untouched.
    EmptyInput,
    /// No open connection; input untouched.
    NotConnected,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_sent(self) -> bool {
        self == Self::Sent
    }
}
