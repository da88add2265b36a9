//! Client configuration resolved from CLI flags and their env fallbacks.
//!
//! A `Variant` names one of the four historical chat clients. Each variant is
//! a preset: a `RenderConfig` plus the endpoint rule it used (same-origin
//! `/ws/`, or the hardcoded local server).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::render::{RenderConfig, ScrollStrategy};

pub const DEFAULT_HOST: &str = "localhost:8080";
pub const WS_PATH: &str = "/ws/";
pub const LOCAL_ENDPOINT: &str = "ws://localhost:8080/ws/";

// =============================================================================
// VARIANT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Time label + bubble, list scrolled into view, same-origin.
    Bubble,
    /// Identical output to `Bubble`.
    BubbleRenamed,
    /// Bubble layout without scrolling, fixed local endpoint.
    BubbleLocal,
    /// Color-tinted flat entries, page scrolled to bottom, same-origin.
    Flat,
}

impl Variant {
    pub const ALL: [Variant; 4] = [Self::Bubble, Self::BubbleRenamed, Self::BubbleLocal, Self::Flat];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::BubbleRenamed => "bubble-renamed",
            Self::BubbleLocal => "bubble-local",
            Self::Flat => "flat",
        }
    }

    #[must_use]
    pub fn render_config(self) -> RenderConfig {
        match self {
            Self::Bubble | Self::BubbleRenamed => RenderConfig::bubble(),
            Self::BubbleLocal => RenderConfig::bubble().with_scroll(ScrollStrategy::None),
            Self::Flat => RenderConfig::flat(),
        }
    }

    #[must_use]
    pub fn uses_same_origin(self) -> bool {
        !matches!(self, Self::BubbleLocal)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == raw.trim())
            .ok_or_else(|| ClientError::Config(format!("unknown variant: {raw}")))
    }
}

// =============================================================================
// ENDPOINT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// `ws://{host}/ws/`, or `wss://` when the origin is secure.
    SameOrigin { host: String, secure: bool },
    /// An explicit endpoint URL.
    Fixed { url: String },
}

impl Endpoint {
    /// Resolve the WebSocket URL to dial.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] for an empty or scheme-qualified
    /// host, or a fixed URL that is not `ws`, `wss`, `http` or `https`.
    pub fn url(&self) -> Result<String, ClientError> {
        match self {
            Self::SameOrigin { host, secure } => {
                let host = host.trim();
                if host.is_empty() || host.contains("://") || host.contains('/') {
                    return Err(ClientError::InvalidUrl(host.to_owned()));
                }
                let scheme = if *secure { "wss" } else { "ws" };
                Ok(format!("{scheme}://{host}{WS_PATH}"))
            }
            Self::Fixed { url } => ws_url(url),
        }
    }
}

/// Normalize a base URL to a WebSocket URL. `http(s)` maps to `ws(s)`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidUrl`] for any other scheme.
pub fn ws_url(base_url: &str) -> Result<String, ClientError> {
    let base_url = base_url.trim();
    if base_url.starts_with("ws://") || base_url.starts_with("wss://") {
        return Ok(base_url.to_owned());
    }
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{rest}"));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{rest}"));
    }

    Err(ClientError::InvalidUrl(base_url.to_owned()))
}

// =============================================================================
// CLIENT CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    pub variant: Variant,
    pub endpoint: Endpoint,
    pub render: RenderConfig,
}

impl ClientConfig {
    /// Build the config for `variant`. An explicit `url` always wins; otherwise
    /// same-origin variants dial `host` and the local variant its fixed URL.
    /// A blank `url` counts as absent.
    #[must_use]
    pub fn new(variant: Variant, host: &str, secure: bool, url: Option<String>) -> Self {
        let endpoint = match url.filter(|url| !url.trim().is_empty()) {
            Some(url) => Endpoint::Fixed { url },
            None if variant.uses_same_origin() => Endpoint::SameOrigin { host: host.to_owned(), secure },
            None => Endpoint::Fixed { url: LOCAL_ENDPOINT.to_owned() },
        };
        Self { variant, endpoint, render: variant.render_config() }
    }

    /// # Errors
    ///
    /// See [`Endpoint::url`].
    pub fn url(&self) -> Result<String, ClientError> {
        self.endpoint.url()
    }
}
