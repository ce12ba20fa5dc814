//! Customer entity type - Production companies and individuals renting gear

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{default_revision, Entity};
use crate::core::identity::{EntityId, EntityPrefix};

/// A Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: EntityId,

    /// Contact name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Production company
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    pub author: String,

    /// Entity revision number
    #[serde(default = "default_revision")]
    pub entity_revision: u32,
}

impl Entity for Customer {
    const PREFIX: EntityPrefix = EntityPrefix::Cus;

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

impl Customer {
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cus),
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            notes: None,
            created: Utc::now(),
            author: author.into(),
            entity_revision: 1,
        }
    }

    /// Name with company, e.g. "Ayşe Kaya (Acme Films)"
    pub fn display_name(&self) -> String {
        match self.company.as_deref().filter(|c| !c.is_empty()) {
            Some(company) => format!("{} ({})", self.name, company),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_creation() {
        let c = Customer::new("Ayşe Kaya", "test");
        assert!(c.id.to_string().starts_with("CUS-"));
        assert_eq!(c.display_name(), "Ayşe Kaya");
    }

    #[test]
    fn test_display_name_with_company() {
        let mut c = Customer::new("Ayşe Kaya", "test");
        c.company = Some("Acme Films".to_string());
        assert_eq!(c.display_name(), "Ayşe Kaya (Acme Films)");

        c.company = Some(String::new());
        assert_eq!(c.display_name(), "Ayşe Kaya");
    }
}
