//! CSS color strings used by palette records.
//!
//! Colors are written as `rgb(r,g,b)`. Parsing also accepts `#rrggbb` and
//! `#rgb`, which is how hand-edited palette files usually spell them.

use painting::Rgb8;

use crate::error::PaletteError;

/// Format a color as `rgb(r,g,b)`
pub fn format_css_color(color: Rgb8) -> String {
    color.to_css()
}

/// Parse `rgb(r, g, b)`, `#rrggbb` or `#rgb` (case-insensitive, surrounding
/// whitespace ignored)
pub fn parse_css_color(input: &str) -> Result<Rgb8, PaletteError> {
    let invalid = || PaletteError::InvalidColor(input.to_string());
    let trimmed = input.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    let lower = trimmed.to_ascii_lowercase();
    let body = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut channels = body.split(',').map(|c| c.trim().parse::<u8>());
    let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) = (
        channels.next(),
        channels.next(),
        channels.next(),
        channels.next(),
    ) else {
        return Err(invalid());
    };
    Ok(Rgb8::new(r, g, b))
}

fn parse_hex(hex: &str) -> Option<Rgb8> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb8::new(r, g, b))
        }
        3 => {
            // #abc expands to #aabbcc
            let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
            Some(Rgb8::new(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        _ => None,
    }
}
