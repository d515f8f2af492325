//! Escaping of special characters in attribute values and free text.
//!
//! Five characters are escaped: `<`, `>`, `&`, `"` and newline. The newline
//! escape is `&#xA` with no trailing `;`. Existing project files contain that
//! exact sequence, so the decoder matches those four characters literally
//! instead of parsing numeric character references.

use std::borrow::Cow;

/// Escape written for a newline. Deliberately not terminated by `;`.
pub const NEWLINE_ESCAPE: &str = "&#xA";

/// Escape sequences paired with the character they stand for, in the order
/// the decoder tests them.
pub const ESCAPES: [(&str, char); 5] = [
    (NEWLINE_ESCAPE, '\n'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&quot;", '"'),
];

/// Get the escape sequence for a character, if it needs one.
#[inline]
pub fn escape_for(c: char) -> Option<&'static str> {
    match c {
        '\n' => Some(NEWLINE_ESCAPE),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Append the encoded form of one character to `out`.
#[inline]
pub fn encode_char(c: char, out: &mut String) {
    match escape_for(c) {
        Some(escape) => out.push_str(escape),
        None => out.push(c),
    }
}

/// Append `text` to `out` with every special character escaped.
pub fn encode_into(text: &str, out: &mut String) {
    out.reserve(text.len());
    for c in text.chars() {
        encode_char(c, out);
    }
}

/// Encode a whole string.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn encode(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| escape_for(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    encode_into(text, &mut out);
    Cow::Owned(out)
}

/// Match an escape sequence at the start of `text`.
///
/// Returns the decoded character and the length of the escape in bytes.
/// The whole escape must lie inside `text`; a truncated one does not match.
#[inline]
pub fn decode_at(text: &str) -> Option<(char, usize)> {
    if !text.starts_with('&') {
        return None;
    }

    ESCAPES
        .iter()
        .find(|(escape, _)| text.starts_with(escape))
        .map(|&(escape, c)| (c, escape.len()))
}

/// Decode every recognised escape in `text`.
///
/// An `&` that does not begin a known escape is passed through unchanged.
pub fn decode(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find('&') else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);

    let mut rest = &text[first..];
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match decode_at(rest) {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}
