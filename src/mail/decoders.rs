use std::sync::LazyLock;

use regex::Regex;

use crate::domain::page::ContentKind;

// Matches only a single-character quoted charset value; anything longer (or
// unquoted, or preceded by whitespace) falls through to the utf-8 default.
// TODO: decide whether this should capture the full quoted value instead.
static CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^charset="([^"])""#).unwrap());

/// Derive `(content kind, charset)` from a declared Content-Type header.
/// Never fails: malformed media types degrade to plain/utf-8.
pub fn content_kind_and_charset(header: &str) -> (ContentKind, String) {
    let (media_type, params) = match header.split_once(';') {
        Some((t, p)) => (t, p),
        None => (header, ""),
    };

    let charset = CHARSET_RE
        .captures(params)
        .map(|c| c[1].to_lowercase())
        .unwrap_or_else(|| "utf-8".to_string());

    let kind = match media_type.trim().split_once('/') {
        Some((kind, subtype)) if kind.eq_ignore_ascii_case("text") => {
            if subtype.eq_ignore_ascii_case("html") {
                ContentKind::Html
            } else {
                ContentKind::Plain
            }
        }
        Some(_) => ContentKind::Binary,
        None => ContentKind::Plain,
    };

    (kind, charset)
}

/// A header line has a colon before any space. Mailbox envelope lines
/// ("From alice@example.com Mon ...") fail this test.
pub fn is_header_line(line: &[u8]) -> bool {
    for &b in line {
        match b {
            b':' => return true,
            b' ' | b'\r' | b'\n' => return false,
            _ => {}
        }
    }
    false
}

/// Byte offset of the first genuine header line, skipping any leading
/// envelope junk. Gives up at the first blank line (start of the body) and
/// falls back to the beginning of the input.
pub fn header_block_start(raw: &[u8]) -> usize {
    let mut offset = 0;
    for line in raw.split_inclusive(|&b| b == b'\n') {
        if line == b"\n" || line == b"\r\n" {
            break;
        }
        if is_header_line(line) {
            return offset;
        }
        offset += line.len();
    }
    0
}
