//! Normalization of extracted text.
//!
//! Line structure is kept: `\r\n` and `\r` become `\n`, every other control
//! character (C0, DEL, C1) and every run of whitespace inside a line becomes
//! a single space, spaces next to a newline are dropped and the result is
//! trimmed. The transformation is idempotent.

/// Clean raw extracted text. Never fails; empty input gives an empty string.
pub fn clean(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        let ch = match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                '\n'
            }
            other => other,
        };

        if ch == '\n' {
            out.push('\n');
            pending_space = false;
        } else if ch.is_control() || ch.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() && !out.ends_with('\n') {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }

    out.trim().to_string()
}
