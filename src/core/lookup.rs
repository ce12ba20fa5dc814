//! Scan lookup - resolve a scanned string to an equipment record
//!
//! Scanned input is trimmed, then tried as a short code first. Short codes
//! compare case-insensitively, so a scanner in lowercase mode still hits
//! `KSONY`. If nothing carries that code, the input is treated as a primary
//! identifier. Primary ids are 30 characters long, so the two key spaces
//! never overlap.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::shortcode::ShortCode;
use crate::core::store::{Store, StoreError};
use crate::entities::Equipment;

/// Which key resolved the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupVia {
    ShortCode,
    PrimaryId,
}

impl std::fmt::Display for LookupVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupVia::ShortCode => write!(f, "short code"),
            LookupVia::PrimaryId => write!(f, "primary id"),
        }
    }
}

/// A resolved scan
#[derive(Debug, Clone)]
pub struct Lookup {
    pub equipment: Equipment,
    pub via: LookupVia,
    /// Other records sharing the matched short code
    pub collisions: Vec<EntityId>,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no equipment found for '{0}'")]
    NotFound(String),

    #[error("{name} is out of stock (stock: {stock})")]
    OutOfStock { name: String, stock: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve scanned or typed input to an equipment record
///
/// Among several records sharing a short code, the oldest one wins and the
/// rest are reported in [`Lookup::collisions`].
pub fn lookup_equipment(store: &Store, scanned: &str) -> Result<Lookup, LookupError> {
    let input = scanned.trim();

    if let Ok(code) = ShortCode::parse(input) {
        // load_all returns oldest first
        let mut matches = store
            .load_all::<Equipment>()?
            .into_iter()
            .filter(|e| e.short_code == code);

        if let Some(equipment) = matches.next() {
            let collisions: Vec<EntityId> = matches.map(|e| e.id).collect();
            if !collisions.is_empty() {
                tracing::warn!(
                    code = %code,
                    chosen = %equipment.id,
                    others = collisions.len(),
                    "short code shared by several equipment records"
                );
            }
            tracing::debug!(code = %code, id = %equipment.id, "resolved by short code");
            return Ok(Lookup {
                equipment,
                via: LookupVia::ShortCode,
                collisions,
            });
        }
    }

    match EntityId::parse(input) {
        Ok(id) if id.prefix() == EntityPrefix::Eqp => match store.get::<Equipment>(&id) {
            Ok(equipment) => {
                tracing::debug!(id = %id, "resolved by primary id");
                Ok(Lookup {
                    equipment,
                    via: LookupVia::PrimaryId,
                    collisions: Vec::new(),
                })
            }
            Err(StoreError::NotFound { .. }) => Err(LookupError::NotFound(input.to_string())),
            Err(e) => Err(e.into()),
        },
        _ => Err(LookupError::NotFound(input.to_string())),
    }
}

/// Resolve a reference that may be a short code, a primary id, or an id fragment
pub fn resolve_equipment(store: &Store, reference: &str) -> Result<Equipment, LookupError> {
    match lookup_equipment(store, reference) {
        Ok(hit) => Ok(hit.equipment),
        Err(LookupError::NotFound(_)) => store.find::<Equipment>(reference).map_err(|e| match e {
            StoreError::NotFound { .. } => LookupError::NotFound(reference.trim().to_string()),
            other => other.into(),
        }),
        Err(e) => Err(e),
    }
}

/// Refuse equipment with no stock left
pub fn ensure_in_stock(equipment: &Equipment) -> Result<(), LookupError> {
    if equipment.is_out_of_stock() {
        return Err(LookupError::OutOfStock {
            name: equipment.name.clone(),
            stock: equipment.stock,
        });
    }
    Ok(())
}

/// Equipment grouped by short code
pub struct ShortCodeIndex {
    by_code: BTreeMap<ShortCode, Vec<EntityId>>,
}

impl ShortCodeIndex {
    pub fn build(equipment: &[Equipment]) -> Self {
        let mut by_code: BTreeMap<ShortCode, Vec<EntityId>> = BTreeMap::new();
        for e in equipment {
            by_code
                .entry(e.short_code.clone())
                .or_default()
                .push(e.id.clone());
        }
        Self { by_code }
    }

    pub fn load(store: &Store) -> Result<Self, StoreError> {
        Ok(Self::build(&store.load_all::<Equipment>()?))
    }

    /// Records currently holding a code
    pub fn holders(&self, code: &ShortCode) -> &[EntityId] {
        self.by_code.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Codes held by more than one record
    pub fn collisions(&self) -> impl Iterator<Item = (&ShortCode, &[EntityId])> {
        self.by_code
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(code, ids)| (code, ids.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::Project;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store) {
        let tmp = TempDir::new().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        (tmp, Store::new(&project))
    }

    #[test]
    fn test_lookup_by_short_code() {
        let (_tmp, store) = setup();
        let eqp = Equipment::new("Sony A7S III", "Kamera", "test");
        store.create(&eqp).unwrap();

        let hit = lookup_equipment(&store, "KSONY").unwrap();
        assert_eq!(hit.equipment.id, eqp.id);
        assert_eq!(hit.via, LookupVia::ShortCode);
        assert!(hit.collisions.is_empty());

        // Scanners sometimes emit lowercase or trailing newlines
        let hit = lookup_equipment(&store, " ksony\n").unwrap();
        assert_eq!(hit.equipment.id, eqp.id);
    }

    #[test]
    fn test_lookup_falls_back_to_primary_id() {
        let (_tmp, store) = setup();
        let eqp = Equipment::new("Sony A7S III", "Kamera", "test");
        store.create(&eqp).unwrap();

        let hit = lookup_equipment(&store, &eqp.id.to_string()).unwrap();
        assert_eq!(hit.equipment.id, eqp.id);
        assert_eq!(hit.via, LookupVia::PrimaryId);
    }

    #[test]
    fn test_lookup_not_found() {
        let (_tmp, store) = setup();
        assert!(matches!(
            lookup_equipment(&store, "LSONY"),
            Err(LookupError::NotFound(s)) if s == "LSONY"
        ));
        let missing = EntityId::new(EntityPrefix::Eqp).to_string();
        assert!(matches!(
            lookup_equipment(&store, &missing),
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            lookup_equipment(&store, "garbage input"),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_lookup_reports_collisions_and_prefers_oldest() {
        let (_tmp, store) = setup();
        let older = Equipment::new("Sony A7S III", "Kamera", "test");
        let mut newer = Equipment::new("Sony A7S IV", "Kamera", "test");
        newer.created = older.created + chrono::Duration::seconds(5);
        store.create(&newer).unwrap();
        store.create(&older).unwrap();

        let hit = lookup_equipment(&store, "KSONY").unwrap();
        assert_eq!(hit.equipment.id, older.id);
        assert_eq!(hit.collisions, vec![newer.id.clone()]);

        // The primary id still reaches the newer record
        let hit = lookup_equipment(&store, &newer.id.to_string()).unwrap();
        assert_eq!(hit.equipment.id, newer.id);
    }

    #[test]
    fn test_resolve_equipment_accepts_id_fragment() {
        let (_tmp, store) = setup();
        let eqp = Equipment::new("Tripod", "Destekleyici", "test");
        store.create(&eqp).unwrap();

        let id = eqp.id.to_string();
        let found = resolve_equipment(&store, &id[id.len() - 10..]).unwrap();
        assert_eq!(found.id, eqp.id);
        assert!(matches!(
            resolve_equipment(&store, "nothing-like-it"),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_ensure_in_stock() {
        let eqp = Equipment::new("Zoom H6", "Ses", "test").with_stock(0);
        assert!(matches!(
            ensure_in_stock(&eqp),
            Err(LookupError::OutOfStock { stock: 0, .. })
        ));
        assert!(ensure_in_stock(&eqp.with_stock(1)).is_ok());
    }

    #[test]
    fn test_short_code_index() {
        let a = Equipment::new("Sony A7S III", "Kamera", "test");
        let b = Equipment::new("Sony A7S IV", "Kamera", "test");
        let c = Equipment::new("Zoom H6", "Ses", "test");
        let index = ShortCodeIndex::build(&[a.clone(), b.clone(), c.clone()]);

        let collisions: Vec<_> = index.collisions().collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].0.as_str(), "KSONY");
        assert_eq!(collisions[0].1.len(), 2);
        assert_eq!(index.holders(&c.short_code), &[c.id.clone()]);
    }
}
