use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

/// Compose text to Unicode NFC.
///
/// Extractors hand back decomposed forms (`ı` + combining marks, `S` + U+0327)
/// depending on the source format; label matching needs one form.
pub fn to_nfc(s: &str) -> String {
    s.nfc().collect()
}

/// Undo UTF-8 bytes that were decoded as Latin-1 somewhere upstream.
///
/// Multipart transports commonly hand over `Ã\u{9e}ablon` for `Şablon`.
/// If every char fits in one byte and at least one is non-ASCII, the chars
/// are reinterpreted as bytes and re-decoded as UTF-8. Anything that does not
/// decode cleanly is returned unchanged.
pub fn repair_mojibake(s: &str) -> Cow<'_, str> {
    if s.is_ascii() {
        return Cow::Borrowed(s);
    }

    let mut bytes = Vec::with_capacity(s.len());
    for c in s.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(b) => bytes.push(b),
            // Already holds chars outside Latin-1, so it was decoded correctly.
            Err(_) => return Cow::Borrowed(s),
        }
    }

    match String::from_utf8(bytes) {
        Ok(repaired) => Cow::Owned(repaired),
        Err(_) => Cow::Borrowed(s),
    }
}
