//! Employee entity type - Rental desk staff

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{default_revision, Entity};
use crate::core::identity::{EntityId, EntityPrefix};

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Staff,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Staff => write!(f, "staff"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// An Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier
    pub id: EntityId,

    /// Display name; may be empty
    #[serde(default)]
    pub name: String,

    /// Login email (matched case-insensitively)
    pub email: String,

    #[serde(default)]
    pub role: Role,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    pub author: String,

    /// Entity revision number
    #[serde(default = "default_revision")]
    pub entity_revision: u32,
}

impl Entity for Employee {
    const PREFIX: EntityPrefix = EntityPrefix::Emp;

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

impl Employee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Emp),
            name: name.into(),
            email: email.into().trim().to_string(),
            role,
            created: Utc::now(),
            author: author.into(),
            entity_revision: 1,
        }
    }

    /// Name, or the local part of the email when no name is set
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if !name.is_empty() {
            return name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Case-insensitive email comparison
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_email() {
        let e = Employee::new("", "deniz@example.com", Role::Staff, "test");
        assert_eq!(e.display_name(), "deniz");

        let e = Employee::new("Deniz Y.", "deniz@example.com", Role::Staff, "test");
        assert_eq!(e.display_name(), "Deniz Y.");
    }

    #[test]
    fn test_email_match_is_case_insensitive() {
        let e = Employee::new("", " Deniz@Example.com ", Role::Admin, "test");
        assert!(e.has_email("deniz@example.com"));
        assert!(e.is_admin());
        assert!(!e.has_email("other@example.com"));
    }

    #[test]
    fn test_role_defaults_to_staff() {
        let id = EntityId::new(EntityPrefix::Emp);
        let yaml = format!(
            "id: {}\nemail: a@b.c\ncreated: 2024-05-01T10:00:00Z\nauthor: ops\n",
            id
        );
        let e: Employee = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(e.role, Role::Staff);
        assert_eq!(e.display_name(), "a");
    }
}
