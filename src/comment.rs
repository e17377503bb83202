//! EXIF UserComment decoding.
//!
//! The UserComment field starts with an 8-byte character code indicator
//! (e.g. "UNICODE\0" or "ASCII\0\0\0") followed by the comment payload.
//! AI generators write UTF-8 regardless of what the indicator claims, so
//! the indicator value is dropped without being inspected.

/// Decode a raw UserComment payload into text.
///
/// Skips the 8-byte character code prefix and decodes the rest as UTF-8.
/// On invalid UTF-8 the original bytes are widened to characters as-is
/// (degraded but never an error). Comments shorter than the prefix are
/// treated as already being text.
pub fn decode_user_comment(raw: &[u8]) -> String {
    if raw.len() < 8 {
        return widen_bytes(raw);
    }

    match std::str::from_utf8(&raw[8..]) {
        Ok(text) => text.to_owned(),
        Err(_) => widen_bytes(raw),
    }
}

/// Map each byte to the Unicode scalar with the same value (Latin-1).
fn widen_bytes(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}
