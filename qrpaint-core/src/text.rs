//! Payload preparation for text sources.

/// Expand text into the byte payload handed to the encoder.
///
/// Each UTF-16 code unit becomes one to three UTF-8 bytes, so the encoder
/// sees one byte per "character" and multi-byte characters survive the trip
/// through scanners that decode byte mode as UTF-8. Code units above the
/// surrogate range expand to three bytes; this includes unpaired surrogate
/// halves, which keeps the transform total.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // masked to < 0x100 before every cast
pub fn utf8_expand(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            unit if unit > 0x07FF => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            unit => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}
