//! Percent-encoding helpers.

use percent_encoding::{percent_encode_byte, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by `raw_url_encode` (RFC 3986 unreserved).
const RAW_URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes every character of a URL that may not appear literally.
///
/// Structural characters (`:/?#[]@!$&'()*+,;=`) and existing `%XX` escapes are
/// kept, so the result still parses into the same components. Spaces, control
/// characters, non-ASCII bytes, `"<>\^`{|}` and stray `%` signs are escaped.
pub fn encode_unsafe(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    for (i, &byte) in bytes.iter().enumerate() {
        let escape = match byte {
            b'%' => !is_escape_at(bytes, i),
            b'"' | b'<' | b'>' | b'\\' | b'^' | b'`' | b'{' | b'|' | b'}' => true,
            b if b <= b' ' || b >= 0x7f => true,
            _ => false,
        };
        if escape {
            out.push_str(percent_encode_byte(byte));
        } else {
            out.push(byte as char);
        }
    }
    out
}

/// Encodes everything except RFC 3986 unreserved characters.
pub fn raw_url_encode(value: &str) -> String {
    utf8_percent_encode(value, RAW_URL_ENCODE_SET).to_string()
}

fn is_escape_at(bytes: &[u8], i: usize) -> bool {
    bytes.len() > i + 2 && bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit()
}
