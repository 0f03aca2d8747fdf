//! Minimal helpers for writing standalone HTML and SVG text.

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `body` in a complete UTF-8 document.
pub fn document(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        head,
        body
    )
}

/// Coordinates in SVG output use two decimals; shorter output, stable bytes.
pub fn px(v: f64) -> String {
    format!("{:.2}", v)
}

/// Human-readable number for axis ticks and tooltips.
///
/// Very small or very large magnitudes switch to scientific notation, since
/// precipitation rates are of order 1e-5.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-2..1e5).contains(&magnitude) {
        return format!("{:.2e}", v);
    }
    let fixed = format!("{:.3}", v);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
