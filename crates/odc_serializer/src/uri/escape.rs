use alloc::string::String;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes everything but the unreserved characters
/// `A-Z a-z 0-9 - . _ ~`, byte by byte over UTF-8, with uppercase hex.
///
/// # Examples
///
/// ```
/// use odc_serializer::uri::escape_data_string;
///
/// assert_eq!(escape_data_string("a b'c"), "a%20b%27c");
/// assert_eq!(escape_data_string("é"), "%C3%A9");
/// ```
pub fn escape_data_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
}

/// Escapes a literal that may contain quoted sections.
///
/// Quoted sections (`'...'`, with `''` as an embedded quote) are escaped
/// whole, delimiters included, as [`escape_data_string`] does. Outside of
/// them only `+` is escaped; everything else is kept. An unterminated
/// section runs to the end of the text.
///
/// # Examples
///
/// ```
/// use odc_serializer::uri::escape_quoted_literal;
///
/// assert_eq!(escape_quoted_literal("'it''s'"), "%27it%27%27s%27");
/// assert_eq!(escape_quoted_literal("NS.Color'Red'"), "NS.Color%27Red%27");
/// assert_eq!(escape_quoted_literal("2024-05-01T10:00:00+02:00"), "2024-05-01T10:00:00%2B02:00");
/// ```
pub fn escape_quoted_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut rest = literal;

    while let Some(start) = rest.find('\'') {
        push_unquoted(&mut out, &rest[..start]);
        let section = &rest[start..];
        let len = quoted_len(section);
        push_escaped(&mut out, &section[..len]);
        rest = &section[len..];
    }
    push_unquoted(&mut out, rest);
    out
}

fn push_unquoted(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '+' => out.push_str("%2B"),
            _ => out.push(ch),
        }
    }
}

/// Length of the quoted section at the start of `text`, delimiters included.
fn quoted_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

// -----------------------------------------------------------------------------
// Tests
