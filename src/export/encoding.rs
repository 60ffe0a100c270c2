//! Lossy single-byte transcoding for the PDF path.
//!
//! The PDF renderer uses a built-in font with WinAnsiEncoding, which agrees
//! with Latin-1 on the printable ranges kept here. Everything else is either
//! replaced or dropped, so the PDF can differ from the `.txt` output.

use serde::{Deserialize, Serialize};

/// Byte written in place of an unrepresentable character
pub const REPLACEMENT: u8 = b'?';

/// Policy for characters the PDF font cannot encode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unrepresentable {
    /// Substitute [`REPLACEMENT`]
    #[default]
    Replace,
    /// Remove the character
    Drop,
}

/// Whether `c` survives transcoding unchanged
pub fn is_representable(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}')
}

/// Transcode `text` to single-byte form. Line breaks are always kept.
pub fn transcode(text: &str, policy: Unrepresentable) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        if is_representable(c) {
            bytes.push(c as u32 as u8);
        } else if policy == Unrepresentable::Replace {
            bytes.push(REPLACEMENT);
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| char::from(b)).collect()
    }

    #[test]
    fn test_latin1_text_is_preserved() {
        let text = "Café au lait, naïve façade\n¡Olé! £5 ±1 ÿ";
        let bytes = transcode(text, Unrepresentable::Replace);
        assert_eq!(bytes.len(), text.chars().count());
        assert_eq!(decode(&bytes), text);
    }

    #[test]
    fn test_replace_policy() {
        let bytes = transcode("rain 雨 — “drops”", Unrepresentable::Replace);
        assert_eq!(decode(&bytes), "rain ? ? ?drops?");
    }

    #[test]
    fn test_drop_policy() {
        let bytes = transcode("rain 雨 — “drops”", Unrepresentable::Drop);
        assert_eq!(decode(&bytes), "rain   drops");
    }

    #[test]
    fn test_control_characters_are_not_representable() {
        assert!(!is_representable('\t'));
        assert!(!is_representable('\u{85}'));
        assert!(!is_representable('€'));
        assert!(is_representable('\n'));
        assert!(is_representable('\u{a0}'));
    }

    #[test]
    fn test_transcoding_is_deterministic() {
        let text = "emoji 🌧 and kanji 雨";
        assert_eq!(
            transcode(text, Unrepresentable::Replace),
            transcode(text, Unrepresentable::Replace)
        );
    }
}
