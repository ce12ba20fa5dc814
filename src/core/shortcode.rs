//! Short codes - 5-character scannable equipment identifiers
//!
//! A short code is derived once, when an equipment item is created, from its
//! category label and its name:
//!
//! - character 1: the uppercased first letter of the category, or `K` when the
//!   category does not start with an ASCII letter
//! - characters 2-5: the first four ASCII letters/digits of the name,
//!   uppercased, right-padded with `X`
//!
//! `generate("Lens", "Sony A7S III")` gives `LSONY`. Codes are printed on labels
//! and encoded in QR stickers; the scan flow resolves them back to a record
//! (see [`crate::core::lookup`]). Codes are not unique across the inventory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of every short code
pub const SHORT_CODE_LEN: usize = 5;

/// Length of the name fragment (characters 2-5)
pub const NAME_FRAGMENT_LEN: usize = 4;

/// Initial used when the category doesn't start with an ASCII letter (Kamera)
pub const FALLBACK_INITIAL: char = 'K';

/// Filler for names with fewer than four usable characters
pub const PAD_CHAR: char = 'X';

/// Errors from parsing a string as a short code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortCodeError {
    #[error("short code must be {SHORT_CODE_LEN} characters, got {len}")]
    WrongLength { len: usize },

    #[error("invalid character '{ch}' at position {pos} (expected A-Z or 0-9)")]
    InvalidChar { ch: char, pos: usize },
}

/// A validated short code: exactly five characters from `[A-Z0-9]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortCode(String);

impl ShortCode {
    /// Derive the short code for an equipment item
    pub fn generate(category: &str, equipment_name: &str) -> Self {
        Self(generate(category, equipment_name))
    }

    /// Parse scanned or typed input as a short code
    ///
    /// Surrounding whitespace is ignored and ASCII letters are uppercased, so
    /// `" lsony "` parses as `LSONY`.
    pub fn parse(input: &str) -> Result<Self, ShortCodeError> {
        let trimmed = input.trim();
        let len = trimmed.chars().count();
        if len != SHORT_CODE_LEN {
            return Err(ShortCodeError::WrongLength { len });
        }

        let mut code = String::with_capacity(SHORT_CODE_LEN);
        for (pos, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ShortCodeError::InvalidChar { ch, pos });
            }
            code.push(ch.to_ascii_uppercase());
        }
        Ok(Self(code))
    }

    /// Check whether input would parse as a short code
    pub fn is_short_code(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The category initial (first character)
    pub fn category_initial(&self) -> char {
        // Always ASCII, so byte slicing is safe
        self.0.as_bytes()[0] as char
    }

    /// The name fragment (characters 2-5)
    pub fn name_fragment(&self) -> &str {
        &self.0[1..]
    }
}

/// Derive a short code string from a category label and an equipment name
///
/// Total over all inputs: empty strings, punctuation-only names and non-Latin
/// text all produce a valid 5-character code.
pub fn generate(category: &str, equipment_name: &str) -> String {
    let initial = category_initial(category);

    let mut fragment: String = equipment_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(NAME_FRAGMENT_LEN)
        .collect();
    while fragment.len() < NAME_FRAGMENT_LEN {
        fragment.push(PAD_CHAR);
    }

    let mut code = String::with_capacity(SHORT_CODE_LEN);
    code.push(initial);
    code.push_str(&fragment);
    code.truncate(SHORT_CODE_LEN);
    code
}

fn category_initial(category: &str) -> char {
    match category.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        _ => FALLBACK_INITIAL,
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShortCode {
    type Err = ShortCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ShortCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_code(code: &str) -> bool {
        code.len() == SHORT_CODE_LEN
            && code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    #[test]
    fn test_generate_basic() {
        assert_eq!(generate("Lens", "SonyA7SIII"), "LSONY");
        assert_eq!(generate("Kamera", "Sony A7S III"), "KSONY");
        assert_eq!(generate("Monitör", "SmallHD 702"), "MSMAL");
    }

    #[test]
    fn test_generate_pads_short_names() {
        assert_eq!(generate("Lens", "AB"), "LABXX");
        assert_eq!(generate("Lens", ""), "LXXXX");
        assert_eq!(generate("Ses", "!!!"), "SXXXX");
    }

    #[test]
    fn test_generate_strips_punctuation_and_spaces() {
        assert_eq!(generate("Ses", "A7-S III"), "SA7SI");
        assert_eq!(generate("Reji", "  v-mount / 2x "), "RVMOU");
    }

    #[test]
    fn test_generate_category_fallback() {
        assert!(generate("", "Anything").starts_with('K'));
        assert!(generate("123", "Anything").starts_with('K'));
        assert!(generate("-Lens", "Anything").starts_with('K'));
        assert!(generate("kamera", "x").starts_with('K'));
        // Non-ASCII initial is not transliterated
        assert_eq!(generate("Işık", "Aputure 600d"), "KAPUT");
        assert_eq!(generate("Ölçüm", "Meter"), "KMETE");
    }

    #[test]
    fn test_generate_strips_non_ascii_letters() {
        assert_eq!(generate("Aksesuar", "Ölçer İş"), "ALERX");
        assert_eq!(generate("Aksesuar", "Ölçer İşık 2"), "ALER2");
        assert_eq!(generate("Lens", "ÖÖÖ"), "LXXXX");
        assert_eq!(generate("Lens", "日本語"), "LXXXX");
    }

    #[test]
    fn test_generate_is_case_insensitive() {
        assert_eq!(generate("kamera", "sony"), generate("Kamera", "SONY"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate("Gimball", "DJI RS 3 Pro");
        let b = generate("Gimball", "DJI RS 3 Pro");
        assert_eq!(a, b);
        assert_eq!(a, "GDJIR");
    }

    #[test]
    fn test_generate_always_valid() {
        let categories = ["", "Lens", "lens", "123", "Işık", " ", "ß", "Z"];
        let names = [
            "",
            " ",
            "a",
            "Sony A7S III",
            "----",
            "ÇĞİÖŞÜ",
            "123456789",
            "a\u{0301}bc",
            "🎥 camera",
        ];
        for category in categories {
            for name in names {
                let code = generate(category, name);
                assert!(
                    is_valid_code(&code),
                    "generate({:?}, {:?}) = {:?}",
                    category,
                    name,
                    code
                );
            }
        }
    }

    #[test]
    fn test_generate_collisions_are_possible() {
        assert_eq!(
            generate("Kamera", "Sony A7S III"),
            generate("Kamera", "Sony A7S IV")
        );
    }

    #[test]
    fn test_parse_accepts_valid_codes() {
        let code = ShortCode::parse("LSONY").unwrap();
        assert_eq!(code.as_str(), "LSONY");
        assert_eq!(code.category_initial(), 'L');
        assert_eq!(code.name_fragment(), "SONY");

        let code = ShortCode::parse("  ka7si\n").unwrap();
        assert_eq!(code.as_str(), "KA7SI");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            ShortCode::parse("LSON"),
            Err(ShortCodeError::WrongLength { len: 4 })
        );
        assert_eq!(
            ShortCode::parse("EQP-01JABCDEFGHJKMNPQRSTVWXYZ0"),
            Err(ShortCodeError::WrongLength { len: 30 })
        );
        assert_eq!(
            ShortCode::parse("LS-NY"),
            Err(ShortCodeError::InvalidChar { ch: '-', pos: 2 })
        );
        assert_eq!(
            ShortCode::parse("LSÖNY"),
            Err(ShortCodeError::InvalidChar { ch: 'Ö', pos: 2 })
        );
    }

    #[test]
    fn test_generated_codes_parse() {
        let code = ShortCode::generate("Destekleyici", "Manfrotto 504X");
        assert_eq!(code.as_str(), "DMANF");
        assert_eq!(ShortCode::parse(code.as_str()), Ok(code));
    }

    #[test]
    fn test_serde_validates() {
        let code: ShortCode = serde_yml::from_str("LSONY").unwrap();
        assert_eq!(code.as_str(), "LSONY");
        assert_eq!(serde_yml::to_string(&code).unwrap().trim(), "LSONY");

        let bad: Result<ShortCode, _> = serde_yml::from_str("\"TOO-LONG\"");
        assert!(bad.is_err());
    }
}
