//! STEP string literals.
//!
//! A literal is wrapped in single quotes and every embedded apostrophe is
//! doubled. No other escaping is applied on output.

/// Encodes `s` as a quoted STEP string literal: `it's` -> `'it''s'`.
#[must_use]
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Decodes a literal produced by [`encode_string`].
///
/// Returns `None` if the input is not wrapped in quotes or contains an
/// apostrophe that is not doubled.
#[must_use]
pub fn decode_string_literal(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            // '' is an escaped apostrophe; a lone one ends the literal early
            if chars.next_if_eq(&'\'').is_none() {
                return None;
            }
        }
        result.push(ch);
    }

    Some(result)
}
