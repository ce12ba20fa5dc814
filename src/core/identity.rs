//! Primary identifiers - `PREFIX-<ULID>` record keys

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Record type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityPrefix {
    /// Equipment item
    Eqp,
    /// Rental (checkout) record
    Rnt,
    /// Customer
    Cus,
    /// Employee
    Emp,
}

impl EntityPrefix {
    /// All prefixes, in directory creation order
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Eqp,
            EntityPrefix::Rnt,
            EntityPrefix::Cus,
            EntityPrefix::Emp,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Eqp => "EQP",
            EntityPrefix::Rnt => "RNT",
            EntityPrefix::Cus => "CUS",
            EntityPrefix::Emp => "EMP",
        }
    }

    /// Singular noun for messages
    pub fn name(&self) -> &'static str {
        match self {
            EntityPrefix::Eqp => "equipment",
            EntityPrefix::Rnt => "rental",
            EntityPrefix::Cus => "customer",
            EntityPrefix::Emp => "employee",
        }
    }

    /// Project-relative directory holding records of this type
    pub fn dir(&self) -> &'static str {
        match self {
            EntityPrefix::Eqp => "equipment",
            EntityPrefix::Rnt => "rentals",
            EntityPrefix::Cus => "customers",
            EntityPrefix::Emp => "employees",
        }
    }

    /// Detect the record type from a file name like `EQP-01J....gear.yaml`
    pub fn from_filename(filename: &str) -> Option<EntityPrefix> {
        let (prefix, _) = filename.split_once('-')?;
        prefix.parse().ok()
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EQP" => Ok(EntityPrefix::Eqp),
            "RNT" => Ok(EntityPrefix::Rnt),
            "CUS" => Ok(EntityPrefix::Cus),
            "EMP" => Ok(EntityPrefix::Emp),
            _ => Err(IdParseError::UnknownPrefix(s.to_string())),
        }
    }
}

/// Errors from parsing an entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("identifier is missing the '-' separator")]
    MissingSeparator,

    #[error("unknown entity prefix '{0}'")]
    UnknownPrefix(String),

    #[error("invalid ULID '{0}'")]
    InvalidUlid(String),
}

/// Primary identifier of a record, e.g. `EQP-01JC8Z4M6W3V2T9Q8R7P6N5K4J`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Generate a fresh identifier
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let (prefix, ulid) = s.trim().split_once('-').ok_or(IdParseError::MissingSeparator)?;
        let prefix: EntityPrefix = prefix.parse()?;
        let ulid =
            Ulid::from_string(ulid).map_err(|_| IdParseError::InvalidUlid(ulid.to_string()))?;
        Ok(Self { prefix, ulid })
    }

    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shortcode::{ShortCode, SHORT_CODE_LEN};

    #[test]
    fn test_new_id_format() {
        let id = EntityId::new(EntityPrefix::Eqp);
        let s = id.to_string();
        assert!(s.starts_with("EQP-"));
        assert_eq!(s.len(), 30);
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = EntityId::new(EntityPrefix::Rnt);
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(parsed.prefix(), EntityPrefix::Rnt);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            EntityId::parse("EQP01ABC"),
            Err(IdParseError::MissingSeparator)
        );
        assert!(matches!(
            EntityId::parse("REQ-01JC8Z4M6W3V2T9Q8R7P6N5K4J"),
            Err(IdParseError::UnknownPrefix(_))
        ));
        assert!(matches!(
            EntityId::parse("EQP-notaulid"),
            Err(IdParseError::InvalidUlid(_))
        ));
    }

    #[test]
    fn test_prefix_parse_is_case_insensitive() {
        assert_eq!("eqp".parse::<EntityPrefix>(), Ok(EntityPrefix::Eqp));
        assert_eq!("Cus".parse::<EntityPrefix>(), Ok(EntityPrefix::Cus));
    }

    #[test]
    fn test_prefix_from_filename() {
        let id = EntityId::new(EntityPrefix::Emp);
        let filename = format!("{}.gear.yaml", id);
        assert_eq!(EntityPrefix::from_filename(&filename), Some(EntityPrefix::Emp));
        assert_eq!(EntityPrefix::from_filename("notes.yaml"), None);
    }

    #[test]
    fn test_ids_never_look_like_short_codes() {
        for prefix in EntityPrefix::all() {
            let id = EntityId::new(*prefix).to_string();
            assert!(id.len() > SHORT_CODE_LEN);
            assert!(!ShortCode::is_short_code(&id));
        }
    }
}
