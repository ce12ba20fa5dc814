//! Project discovery and initialization
//!
//! A gear project is any directory containing a `.gear/` folder. Records live
//! in one sub-directory per type next to it.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::EntityPrefix;

/// Marker directory name
pub const PROJECT_DIR: &str = ".gear";

/// Project config file, relative to the project root
pub const PROJECT_CONFIG: &str = ".gear/config.yaml";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a gear project (no {PROJECT_DIR}/ found in {0} or any parent). Run 'gear init' first")]
    NotFound(PathBuf),

    #[error("project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const DEFAULT_PROJECT_CONFIG: &str = "\
# Gear project configuration
#
# author: Your Name
# email: you@example.com
# default_category: Kamera
# admins:
#   - owner@example.com
";

const GITIGNORE_ENTRIES: &str = "# gear temp and lock files\n*.gear.yaml.tmp\n*.gear.yaml.lock\n";

/// An opened project
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find the project containing the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Find the project containing `start`, walking up through parents
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(PROJECT_DIR).is_dir() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            current = dir.parent();
        }
        Err(ProjectError::NotFound(start.to_path_buf()))
    }

    /// Create the project layout at `root`
    ///
    /// Without `force`, an existing project is left untouched and
    /// `AlreadyExists` is returned.
    pub fn init(root: &Path, force: bool) -> Result<Self, ProjectError> {
        let marker = root.join(PROJECT_DIR);
        if marker.exists() && !force {
            return Err(ProjectError::AlreadyExists(root.to_path_buf()));
        }

        fs::create_dir_all(&marker)?;
        let config_path = root.join(PROJECT_CONFIG);
        if !config_path.exists() || force {
            fs::write(&config_path, DEFAULT_PROJECT_CONFIG)?;
        }

        for prefix in EntityPrefix::all() {
            fs::create_dir_all(root.join(prefix.dir()))?;
        }

        let gitignore = root.join(".gitignore");
        let existing = fs::read_to_string(&gitignore).unwrap_or_default();
        if !existing.contains("*.gear.yaml.tmp") {
            fs::write(&gitignore, format!("{}{}", existing, GITIGNORE_ENTRIES))?;
        }

        tracing::debug!(root = %root.display(), "initialized project");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding records of the given type
    pub fn entity_dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(prefix.dir())
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(PROJECT_CONFIG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_layout() {
        let tmp = TempDir::new().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();

        assert!(project.config_path().exists());
        for prefix in EntityPrefix::all() {
            assert!(project.entity_dir(*prefix).is_dir());
        }
        let gitignore = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(gitignore.contains("*.gear.yaml.tmp"));
        assert!(gitignore.contains("*.gear.yaml.lock"));
    }

    #[test]
    fn test_init_twice_requires_force() {
        let tmp = TempDir::new().unwrap();
        Project::init(tmp.path(), false).unwrap();

        assert!(matches!(
            Project::init(tmp.path(), false),
            Err(ProjectError::AlreadyExists(_))
        ));
        assert!(Project::init(tmp.path(), true).is_ok());

        // gitignore entry isn't duplicated
        let gitignore = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore.matches("*.gear.yaml.tmp").count(), 1);
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        Project::init(tmp.path(), false).unwrap();
        let nested = tmp.path().join("equipment");

        let project = Project::discover_from(&nested).unwrap();
        assert_eq!(project.root(), tmp.path());
    }

    #[test]
    fn test_discover_outside_project_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Project::discover_from(tmp.path()),
            Err(ProjectError::NotFound(_))
        ));
    }
}
