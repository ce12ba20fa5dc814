//! Record store - one YAML file per record
//!
//! Records live at `<project>/<type dir>/<ID>.gear.yaml`. Updates use the
//! record's `entity_revision` as a compare-and-swap token: a write only lands
//! if the file on disk still carries the revision the caller loaded.
//!
//! Every write holds an exclusive `<ID>.gear.yaml.lock` file from the
//! revision check until the new file is renamed into place, so concurrent
//! writers of one record (threads or separate `gear` processes) serialize.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::yaml::{parse_yaml_file, YamlError};

/// Record file suffix
pub const RECORD_SUFFIX: &str = ".gear.yaml";

/// Suffix of a record's write lock, appended to the record file name
pub const LOCK_SUFFIX: &str = ".lock";

/// Suffix of in-flight temp files
pub const TEMP_SUFFIX: &str = ".gear.yaml.tmp";

/// How long a writer waits for another writer's lock
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_RETRY: Duration = Duration::from_millis(2);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no {kind} found matching '{reference}'")]
    NotFound {
        kind: &'static str,
        reference: String,
    },

    #[error("'{reference}' matches {count} {kind} records; use a longer id")]
    Ambiguous {
        kind: &'static str,
        reference: String,
        count: usize,
    },

    #[error("{0} already exists")]
    AlreadyExists(EntityId),

    #[error("{id} was modified by someone else (expected revision {expected}, found {found}); reload and retry")]
    Conflict {
        id: EntityId,
        expected: u32,
        found: u32,
    },

    #[error("{} is locked by another writer; remove the lock file if no gear command is running", .0.display())]
    Locked(PathBuf),

    #[error(transparent)]
    Yaml(#[from] YamlError),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// File-backed record store for one project
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(project: &Project) -> Self {
        Self {
            root: project.root().to_path_buf(),
        }
    }

    /// Open the store of the project containing the current directory
    pub fn discover() -> Result<Self, crate::core::project::ProjectError> {
        Project::discover().map(|p| Self::new(&p))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(prefix.dir())
    }

    /// File path of a record
    pub fn path_for(&self, id: &EntityId) -> PathBuf {
        self.dir(id.prefix()).join(format!("{}{}", id, RECORD_SUFFIX))
    }

    /// Load every record of type `T`, oldest first
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_all<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        let dir = self.dir(T::PREFIX);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_record_file(path) {
                continue;
            }
            match parse_yaml_file::<T>(path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record");
                }
            }
        }

        records.sort_by(|a: &T, b: &T| {
            a.created()
                .cmp(&b.created())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(records)
    }

    /// Load a record by exact id
    pub fn get<T: Entity>(&self, id: &EntityId) -> Result<T, StoreError> {
        let path = self.existing_path::<T>(id)?;
        Ok(parse_yaml_file(&path)?)
    }

    fn existing_path<T: Entity>(&self, id: &EntityId) -> Result<PathBuf, StoreError> {
        let path = self.path_for(id);
        if id.prefix() != T::PREFIX || !path.exists() {
            return Err(StoreError::NotFound {
                kind: T::PREFIX.name(),
                reference: id.to_string(),
            });
        }
        Ok(path)
    }

    /// Resolve a reference: an exact id, or a unique case-insensitive
    /// fragment of one (e.g. the last few ULID characters)
    pub fn find<T: Entity>(&self, reference: &str) -> Result<T, StoreError> {
        let reference = reference.trim();
        if let Ok(id) = EntityId::parse(reference) {
            if id.prefix() == T::PREFIX {
                return self.get(&id);
            }
        }

        let needle = reference.to_ascii_uppercase();
        let not_found = || StoreError::NotFound {
            kind: T::PREFIX.name(),
            reference: reference.to_string(),
        };
        if needle.is_empty() {
            return Err(not_found());
        }

        let mut matches: Vec<T> = self
            .load_all::<T>()?
            .into_iter()
            .filter(|r| r.id().to_string().contains(&needle))
            .collect();

        match matches.len() {
            0 => Err(not_found()),
            1 => Ok(matches.remove(0)),
            count => Err(StoreError::Ambiguous {
                kind: T::PREFIX.name(),
                reference: reference.to_string(),
                count,
            }),
        }
    }

    /// Write a new record; refuses to overwrite
    pub fn create<T: Entity>(&self, record: &T) -> Result<PathBuf, StoreError> {
        let path = self.path_for(record.id());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let _lock = RecordLock::acquire(&path)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists(record.id().clone()));
        }
        write_atomic(&path, &serde_yml::to_string(record)?)?;
        tracing::debug!(id = %record.id(), "created record");
        Ok(path)
    }

    /// Compare-and-swap update
    ///
    /// Succeeds only if the stored revision equals `record.revision()`; the
    /// revision is then bumped in both the file and `record`. The record
    /// lock is held from the revision check to the rename.
    pub fn update<T: Entity>(&self, record: &mut T) -> Result<PathBuf, StoreError> {
        let path = self.existing_path::<T>(record.id())?;
        let _lock = RecordLock::acquire(&path)?;
        let current: T = self.get(record.id())?;
        let expected = record.revision();
        if current.revision() != expected {
            return Err(StoreError::Conflict {
                id: record.id().clone(),
                expected,
                found: current.revision(),
            });
        }

        record.set_revision(expected + 1);
        if let Err(e) = serde_yml::to_string(record)
            .map_err(StoreError::from)
            .and_then(|yaml| write_atomic(&path, &yaml).map_err(StoreError::from))
        {
            record.set_revision(expected);
            return Err(e);
        }
        tracing::debug!(id = %record.id(), revision = expected + 1, "updated record");
        Ok(path)
    }

    /// Remove a record file
    pub fn delete<T: Entity>(&self, id: &EntityId) -> Result<(), StoreError> {
        let path = self.existing_path::<T>(id)?;
        let _lock = RecordLock::acquire(&path)?;
        fs::remove_file(&path)?;
        tracing::debug!(id = %id, "deleted record");
        Ok(())
    }
}

/// Check a path for the record file suffix
pub fn is_record_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(RECORD_SUFFIX))
}

/// Exclusive write lock on one record, released on drop
#[derive(Debug)]
struct RecordLock {
    path: PathBuf,
}

impl RecordLock {
    fn acquire(record: &Path) -> Result<Self, StoreError> {
        let mut name = record.as_os_str().to_owned();
        name.push(LOCK_SUFFIX);
        let path = PathBuf::from(name);

        let started = Instant::now();
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(Self { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if started.elapsed() >= LOCK_TIMEOUT {
                        tracing::warn!(lock = %path.display(), "gave up waiting for record lock");
                        return Err(StoreError::Locked(path));
                    }
                    thread::sleep(LOCK_RETRY);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for RecordLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release record lock");
        }
    }
}

/// Replace a file by writing a uniquely named sibling temp file and renaming
/// it over
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
