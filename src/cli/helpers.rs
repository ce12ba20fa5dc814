//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::io::{self, IsTerminal};

use crate::core::identity::EntityId;

/// Format an EntityId for display, truncating if too long
///
/// Ids are 30 characters; tables show the prefix plus the first ULID
/// characters.
pub fn format_short_id(id: &EntityId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

/// Check if stdin is piped rather than a terminal
pub fn stdin_has_data() -> bool {
    !io::stdin().is_terminal()
}

/// Ask before a destructive action
///
/// Skipped (answering yes) with `--yes` or when stdin is not a terminal.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes || stdin_has_data() {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// `None` for empty or whitespace-only strings
pub fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    #[test]
    fn test_format_short_id() {
        let id = EntityId::new(EntityPrefix::Eqp);
        let formatted = format_short_id(&id);
        assert!(formatted.starts_with("EQP-"));
        assert!(formatted.ends_with("..."));
        assert_eq!(formatted.len(), 16);
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        // Multi-byte names must not split a character
        assert_eq!(truncate_str("Işık Seti Büyük", 7), "Işık...");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-12").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
        );
        assert!(parse_date("12/06/2024").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" a ".to_string())), Some("a".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
