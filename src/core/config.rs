//! Layered configuration
//!
//! Configuration is merged from (lowest to highest precedence):
//! 1. Built-in defaults
//! 2. User config at `<config dir>/gear/config.yaml`
//! 3. Project config at `.gear/config.yaml`
//! 4. Environment variables (`GEAR_AUTHOR`, `GEAR_EMAIL`, `GEAR_EDITOR`, `EDITOR`)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::project::Project;
use crate::entities::equipment::{DEFAULT_CATEGORIES, DEFAULT_CATEGORY};

/// One configuration layer; unset keys fall through to lower layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded as author on new records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Email of the person operating the desk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Editor for `edit` commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Category used when `eqp new` gets none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,

    /// Category list offered in interactive mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    /// Emails that always have admin rights
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<String>,
}

impl Config {
    /// Load the effective configuration for the current directory
    ///
    /// Never fails: unreadable or invalid config files are logged and skipped.
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load the effective configuration for a specific project
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_path() {
            if let Some(layer) = Self::read_layer(&path) {
                config.merge(layer);
            }
        }

        if let Some(project) = project {
            if let Some(layer) = Self::read_layer(&project.config_path()) {
                config.merge(layer);
            }
        }

        config.merge(Self::env_layer());
        config
    }

    /// Path of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gear").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_layer(path: &Path) -> Option<Config> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Option<Config>>(&content) {
            // A file with only comments parses as null
            Ok(layer) => Some(layer.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    fn env_layer() -> Config {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Config {
            author: var("GEAR_AUTHOR"),
            email: var("GEAR_EMAIL"),
            editor: var("GEAR_EDITOR").or_else(|| var("EDITOR")),
            ..Default::default()
        }
    }

    /// Overlay `other` onto `self`; set keys in `other` win
    pub fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_category.is_some() {
            self.default_category = other.default_category;
        }
        if other.categories.is_some() {
            self.categories = other.categories;
        }
        for admin in other.admins {
            if !self.admins.iter().any(|a| a.eq_ignore_ascii_case(&admin)) {
                self.admins.push(admin);
            }
        }
    }

    /// Author name, falling back to the login user
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn editor(&self) -> String {
        self.editor.clone().unwrap_or_else(|| "vi".to_string())
    }

    pub fn default_category(&self) -> &str {
        self.default_category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect())
    }

    /// Check if an email is listed in `admins` (trimmed, case-insensitive)
    pub fn is_listed_admin(&self, email: &str) -> bool {
        let email = email.trim();
        self.admins.iter().any(|a| a.trim().eq_ignore_ascii_case(email))
    }

    /// Open a file in the configured editor and wait for it to exit
    pub fn run_editor(&self, path: &Path) -> std::io::Result<()> {
        let editor = self.editor();
        let mut parts = editor.split_whitespace();
        let program = parts.next().unwrap_or("vi");
        let status = Command::new(program).args(parts).arg(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!(
                "editor '{}' exited with {}",
                editor, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_category(), "Kamera");
        assert_eq!(config.categories().len(), 9);
        assert_eq!(config.editor(), "vi");
        assert!(config.email().is_none());
    }

    #[test]
    fn test_merge_overrides_set_keys_only() {
        let mut base = Config {
            author: Some("user".to_string()),
            email: Some("user@example.com".to_string()),
            ..Default::default()
        };
        base.merge(Config {
            author: Some("project".to_string()),
            default_category: Some("Lens".to_string()),
            ..Default::default()
        });

        assert_eq!(base.author(), "project");
        assert_eq!(base.email(), Some("user@example.com"));
        assert_eq!(base.default_category(), "Lens");
    }

    #[test]
    fn test_admins_accumulate_without_duplicates() {
        let mut base = Config {
            admins: vec!["Owner@Example.com".to_string()],
            ..Default::default()
        };
        base.merge(Config {
            admins: vec!["owner@example.com".to_string(), "boss@example.com".to_string()],
            ..Default::default()
        });
        assert_eq!(base.admins.len(), 2);
        assert!(base.is_listed_admin("  BOSS@example.com "));
        assert!(!base.is_listed_admin("intern@example.com"));
    }

    #[test]
    fn test_read_layer_accepts_comment_only_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "# nothing here\n").unwrap();
        assert_eq!(Config::read_layer(&path), Some(Config::default()));

        std::fs::write(&path, "author: Deniz\nadmins:\n  - a@b.c\n").unwrap();
        let layer = Config::read_layer(&path).unwrap();
        assert_eq!(layer.author.as_deref(), Some("Deniz"));
        assert_eq!(layer.admins, vec!["a@b.c".to_string()]);
    }

    #[test]
    fn test_read_layer_rejects_invalid_yaml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "admins: [unclosed\n").unwrap();
        assert_eq!(Config::read_layer(&path), None);
    }
}
