//! Display helpers computed on read

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Width of the effectiveness bar as a percentage in `0..=100`
pub fn effectiveness_bar_width(score: Option<f64>, scale: f64) -> f64 {
    match score {
        Some(score) if score.is_finite() && scale > 0.0 => (score * 100.0 / scale).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Inline style for the effectiveness bar
pub fn bar_style(width: f64) -> String {
    format!("width: {}%", width)
}

/// Re-indent a JSON document, or return it verbatim if it does not parse
pub fn pretty_json(raw: &str, indent: usize) -> String {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    if value.serialize(&mut serializer).is_err() {
        return raw.to_string();
    }

    String::from_utf8(buf).unwrap_or_else(|_| raw.to_string())
}
