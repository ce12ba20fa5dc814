//! YAML parsing with error handling

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into a typed value with nice error messages
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename).into())
}

/// Parse YAML from a file path
pub fn parse_yaml_file<T: DeserializeOwned>(path: &std::path::Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
        stock: u32,
    }

    #[test]
    fn test_parse_valid_yaml() {
        let yaml = "name: Tripod\nstock: 2";
        let result: Item = parse_yaml(yaml, "test.yaml").unwrap();
        assert_eq!(result.name, "Tripod");
        assert_eq!(result.stock, 2);
    }

    #[test]
    fn test_parse_wrong_type_returns_syntax_error() {
        let yaml = "name: Tripod\nstock: many";
        let result: Result<Item, _> = parse_yaml(yaml, "test.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_parse_missing_file_returns_io_error() {
        let result: Result<Item, _> =
            parse_yaml_file(std::path::Path::new("/nonexistent/gear/item.yaml"));
        assert!(matches!(result, Err(YamlError::Io(_))));
    }
}
