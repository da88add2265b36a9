//! CSS color parsing for terminal tinting of flat entries.
//!
//! Flat entries carry their color as free-form CSS text. The terminal view can
//! only honour the forms it can turn into RGB: `#rgb`, `#rrggbb`,
//! `rgb(r, g, b)` and a handful of named colors. Anything else prints untinted.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
];

/// Parse any supported CSS color form into RGB channels.
#[must_use]
pub fn parse_css_color(raw: &str) -> Option<(u8, u8, u8)> {
    let trimmed = raw.trim();
    if trimmed.starts_with('#') {
        return parse_hex_rgb(trimmed);
    }
    if let Some(args) = trimmed.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_args(args);
    }
    let lower = trimmed.to_ascii_lowercase();
    NAMED.iter().find(|(name, _)| *name == lower).map(|(_, rgb)| *rgb)
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16);
            match (channel(0), channel(1), channel(2)) {
                (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
                _ => None,
            }
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            match (channel(0), channel(2), channel(4)) {
                (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<(u8, u8, u8)> {
    let mut parts = args.split(',').map(|part| part.trim().parse::<u8>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) => Some((r, g, b)),
        _ => None,
    }
}
