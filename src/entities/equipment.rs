//! Equipment entity type - Rentable items in the inventory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{default_revision, Entity};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::shortcode::ShortCode;

/// The catalogue categories used by the rental desk
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Kamera",
    "Lens",
    "Monitör",
    "Ses",
    "Destekleyici",
    "Gimball",
    "Aksesuar",
    "Reji",
    "Işık",
];

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "Kamera";

/// Where an equipment item currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    /// On the shelf, available to rent
    #[default]
    InOffice,
    /// Checked out on an active rental
    OnRental,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentStatus::InOffice => write!(f, "in_office"),
            EquipmentStatus::OnRental => write!(f, "on_rental"),
        }
    }
}

/// An Equipment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique identifier
    pub id: EntityId,

    /// Display name (e.g., "Sony A7S III")
    pub name: String,

    /// Catalogue category (e.g., "Kamera", "Lens")
    #[serde(default = "default_category")]
    pub category: String,

    /// Scannable code derived at creation time; never regenerated
    pub short_code: ShortCode,

    /// Manufacturer serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// Current location status
    #[serde(default)]
    pub status: EquipmentStatus,

    /// Units owned; 0 means out of stock
    #[serde(default = "default_stock")]
    pub stock: u32,

    /// Rental currently holding this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_rental: Option<EntityId>,

    /// Photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who added this item)
    pub author: String,

    /// Entity revision number
    #[serde(default = "default_revision")]
    pub entity_revision: u32,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_stock() -> u32 {
    1
}

impl Entity for Equipment {
    const PREFIX: EntityPrefix = EntityPrefix::Eqp;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn revision(&self) -> u32 {
        self.entity_revision
    }

    fn set_revision(&mut self, revision: u32) {
        self.entity_revision = revision;
    }
}

impl Equipment {
    /// Create a new equipment item, deriving its short code
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let name = name.into().trim().to_string();
        let category = category.into();
        let short_code = ShortCode::generate(&category, &name);
        Self {
            id: EntityId::new(EntityPrefix::Eqp),
            name,
            category,
            short_code,
            serial_number: None,
            status: EquipmentStatus::default(),
            stock: default_stock(),
            current_rental: None,
            image_url: None,
            notes: None,
            tags: Vec::new(),
            created: Utc::now(),
            author: author.into(),
            entity_revision: 1,
        }
    }

    /// Set the stock count (builder style)
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn is_rented(&self) -> bool {
        self.status == EquipmentStatus::OnRental
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Available to check out: on the shelf with stock left
    pub fn is_available(&self) -> bool {
        !self.is_rented() && !self.is_out_of_stock()
    }

    /// Code printed on labels: the short code
    pub fn label_code(&self) -> &str {
        self.short_code.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_creation() {
        let eqp = Equipment::new("Sony A7S III", "Kamera", "test");

        assert!(eqp.id.to_string().starts_with("EQP-"));
        assert_eq!(eqp.name, "Sony A7S III");
        assert_eq!(eqp.short_code.as_str(), "KSONY");
        assert_eq!(eqp.status, EquipmentStatus::InOffice);
        assert_eq!(eqp.stock, 1);
        assert!(eqp.is_available());
    }

    #[test]
    fn test_name_is_trimmed_before_deriving_code() {
        let eqp = Equipment::new("  AB  ", "Lens", "test");
        assert_eq!(eqp.name, "AB");
        assert_eq!(eqp.short_code.as_str(), "LABXX");
    }

    #[test]
    fn test_availability() {
        let mut eqp = Equipment::new("Zoom H6", "Ses", "test").with_stock(0);
        assert!(eqp.is_out_of_stock());
        assert!(!eqp.is_available());

        eqp.stock = 2;
        eqp.status = EquipmentStatus::OnRental;
        assert!(eqp.is_rented());
        assert!(!eqp.is_available());
    }

    #[test]
    fn test_default_categories_yield_valid_initials() {
        let initials: Vec<char> = DEFAULT_CATEGORIES
            .iter()
            .map(|c| ShortCode::generate(c, "x").category_initial())
            .collect();
        assert_eq!(initials, vec!['K', 'L', 'M', 'S', 'D', 'G', 'A', 'R', 'K']);
    }

    #[test]
    fn test_equipment_roundtrip() {
        let mut eqp = Equipment::new("Aputure 600d", "Işık", "test").with_stock(3);
        eqp.serial_number = Some("AP-6001".to_string());

        let yaml = serde_yml::to_string(&eqp).unwrap();
        assert!(yaml.contains("short_code: KAPUT"));
        assert!(yaml.contains("status: in_office"));

        let parsed: Equipment = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.id, eqp.id);
        assert_eq!(parsed.short_code, eqp.short_code);
        assert_eq!(parsed.stock, 3);
        assert_eq!(parsed.entity_revision, 1);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let id = EntityId::new(EntityPrefix::Eqp);
        let yaml = format!(
            "id: {}\nname: Tripod\nshort_code: KTRIP\ncreated: 2024-05-01T10:00:00Z\nauthor: ops\n",
            id
        );
        let parsed: Equipment = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.category, "Kamera");
        assert_eq!(parsed.stock, 1);
        assert_eq!(parsed.status, EquipmentStatus::InOffice);
        assert_eq!(parsed.entity_revision, 1);
    }

    #[test]
    fn test_entity_trait_implementation() {
        let eqp = Equipment::new("Sennheiser MKE 600", "Ses", "test_author");

        assert_eq!(Equipment::PREFIX, EntityPrefix::Eqp);
        assert_eq!(eqp.title(), "Sennheiser MKE 600");
        assert_eq!(eqp.author(), "test_author");
        assert_eq!(eqp.revision(), 1);
    }
}
