//! The wire code page (Windows-1252).
//!
//! Every byte decodes to exactly one character. The five bytes the code page
//! leaves undefined map to the C1 control with the same value, so decoding and
//! re-encoding any byte sequence is lossless.

use crate::error::{ByteError, ByteResult};

/// Characters for bytes `0x80..=0x9F`.
const HIGH_CONTROL_RANGE: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decodes a single byte.
#[must_use]
pub fn decode_byte(byte: u8) -> char {
    match byte {
        0x80..=0x9F => HIGH_CONTROL_RANGE[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}

/// Encodes a single character.
pub fn encode_char(ch: char) -> ByteResult<u8> {
    let code = u32::from(ch);
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return Ok(code as u8);
    }
    HIGH_CONTROL_RANGE
        .iter()
        .position(|&candidate| candidate == ch)
        .map(|idx| 0x80 + idx as u8)
        .ok_or(ByteError::UnmappableChar { ch })
}

/// Decodes a NUL-padded character array, stopping at the first NUL.
#[must_use]
pub fn decode_char_array(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&byte| byte != 0)
        .map(|&byte| decode_byte(byte))
        .collect()
}

/// Encodes a string into wire bytes.
pub fn encode_str(text: &str) -> ByteResult<Vec<u8>> {
    text.chars().map(encode_char).collect()
}

/// Returns the encoded length of `text`, or the first unmappable character.
pub fn encoded_len(text: &str) -> ByteResult<usize> {
    text.chars().try_fold(0usize, |len, ch| {
        encode_char(ch)?;
        Ok(len + 1)
    })
}
