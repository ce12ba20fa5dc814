//! Output formatting utilities

use crate::cli::OutputFormat;

/// Resolve `auto`: tables for lists, details for single records
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Table
            } else {
                OutputFormat::Auto
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_format() {
        assert_eq!(effective_format(OutputFormat::Auto, true), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Auto, false), OutputFormat::Auto);
        assert_eq!(effective_format(OutputFormat::Csv, true), OutputFormat::Csv);
    }
}
