//! Logging utilities for sanitizing user-supplied strings so logs stay single-line.
//! Badge text fields and malformed control payloads come straight off the radio
//! and may contain control characters that break log readability.

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Truncates very long strings (over `MAX_PREVIEW` chars) with an ellipsis to cap log noise.
pub fn escape_log(s: &str) -> String {
    use std::fmt::Write;

    const MAX_PREVIEW: usize = 200; // a full MTU payload fits; anything longer is noise
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    let mut chars = s.chars();
    for ch in chars.by_ref().take(MAX_PREVIEW) {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Remaining control chars become hex \xNN
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}
