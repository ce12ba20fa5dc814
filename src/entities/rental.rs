//! Rental entity type - A checkout of one equipment item to a customer

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{default_revision, Entity};
use crate::core::identity::{EntityId, EntityPrefix};

/// Rental lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    #[default]
    Active,
    Completed,
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RentalStatus::Active => write!(f, "active"),
            RentalStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Where an active rental stands relative to its planned return date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    /// Planned return is today
    DueToday,
    /// Planned return date has passed
    Overdue,
    /// Planned return is in the future
    Upcoming,
    /// No planned return date recorded
    Unscheduled,
}

impl std::fmt::Display for DueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DueState::DueToday => write!(f, "due today"),
            DueState::Overdue => write!(f, "overdue"),
            DueState::Upcoming => write!(f, "upcoming"),
            DueState::Unscheduled => write!(f, "unscheduled"),
        }
    }
}

/// A Rental entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    /// Unique identifier
    pub id: EntityId,

    /// Rented equipment
    pub equipment: EntityId,

    /// Equipment name at checkout time
    pub equipment_name: String,

    /// Customer record, when the customer is on file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<EntityId>,

    /// Customer name as given at checkout
    pub customer_name: String,

    /// Shoot location / delivery address
    #[serde(default)]
    pub location: String,

    /// Checkout time
    pub start_date: DateTime<Utc>,

    /// Planned return date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_return: Option<NaiveDate>,

    /// Actual return time, set on check-in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_return: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: RentalStatus,

    /// Who recorded the checkout
    pub created_by_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_email: Option<String>,

    /// Who recorded the return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Entity revision number
    #[serde(default = "default_revision")]
    pub entity_revision: u32,
}

impl Entity for Rental {
    const PREFIX: EntityPrefix = EntityPrefix::Rnt;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.equipment_name
    }

    fn created(&self) -> DateTime<Utc> {
        self.start_date
    }

    fn author(&self) -> &str {
        &self.created_by_name
    }

    fn revision(&self) -> u32 {
        self.entity_revision
    }

    fn set_revision(&mut self, revision: u32) {
        self.entity_revision = revision;
    }
}

impl Rental {
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }

    /// Classify against `today`
    pub fn due_state(&self, today: NaiveDate) -> DueState {
        match self.planned_return {
            None => DueState::Unscheduled,
            Some(date) if date == today => DueState::DueToday,
            Some(date) if date < today => DueState::Overdue,
            Some(_) => DueState::Upcoming,
        }
    }

    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        self.due_state(today) == DueState::DueToday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rental(planned: Option<NaiveDate>) -> Rental {
        Rental {
            id: EntityId::new(EntityPrefix::Rnt),
            equipment: EntityId::new(EntityPrefix::Eqp),
            equipment_name: "Sony A7S III".to_string(),
            customer: None,
            customer_name: "Acme Films".to_string(),
            location: "Maslak".to_string(),
            start_date: Utc::now(),
            planned_return: planned,
            actual_return: None,
            status: RentalStatus::Active,
            created_by_name: "ops".to_string(),
            created_by_email: None,
            returned_by: None,
            notes: None,
            entity_revision: 1,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_due_state() {
        let today = date(2024, 6, 10);
        assert_eq!(rental(None).due_state(today), DueState::Unscheduled);
        assert_eq!(rental(Some(today)).due_state(today), DueState::DueToday);
        assert_eq!(rental(Some(date(2024, 6, 9))).due_state(today), DueState::Overdue);
        assert_eq!(rental(Some(date(2024, 6, 11))).due_state(today), DueState::Upcoming);
        assert!(rental(Some(today)).is_due_today(today));
    }

    #[test]
    fn test_rental_roundtrip() {
        let r = rental(Some(date(2024, 6, 12)));
        let yaml = serde_yml::to_string(&r).unwrap();
        assert!(yaml.contains("status: active"));
        assert!(yaml.contains("2024-06-12"));
        assert!(!yaml.contains("actual_return"));

        let parsed: Rental = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.id, r.id);
        assert_eq!(parsed.equipment, r.equipment);
        assert!(parsed.is_active());
    }
}
