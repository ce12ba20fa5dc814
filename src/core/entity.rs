//! Entity trait - common interface for all record types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// Common trait for all gear records
pub trait Entity: Serialize + DeserializeOwned {
    /// The record type prefix
    const PREFIX: EntityPrefix;

    /// Get the record's primary identifier
    fn id(&self) -> &EntityId;

    /// Human-readable title (equipment name, customer name, ...)
    fn title(&self) -> &str;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// Get the author
    fn author(&self) -> &str;

    /// Revision counter used for optimistic concurrency
    fn revision(&self) -> u32;

    fn set_revision(&mut self, revision: u32);
}

pub(crate) fn default_revision() -> u32 {
    1
}
