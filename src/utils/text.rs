use std::borrow::Cow;

/// Decode raw file bytes to text
///
/// Attempts UTF-8 decoding first, falling back to Windows-1252 (CP1252) if UTF-8 fails.
/// Airspace files exported by older tools are frequently Latin-1 encoded, and CP1252 is
/// a superset of the printable Latin-1 range.
///
/// # Returns
///
/// Decoded string (always succeeds with some valid string)
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.into(),
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0,
    }
}
