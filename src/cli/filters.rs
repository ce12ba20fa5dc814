//! Filter enums for list commands

use clap::ValueEnum;

use crate::entities::EquipmentStatus;

/// Equipment status filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum EquipmentStatusFilter {
    /// On the shelf
    InOffice,
    /// Checked out
    OnRental,
    /// Everything - default
    #[default]
    All,
}

impl EquipmentStatusFilter {
    pub fn matches(&self, status: EquipmentStatus) -> bool {
        match self {
            EquipmentStatusFilter::InOffice => status == EquipmentStatus::InOffice,
            EquipmentStatusFilter::OnRental => status == EquipmentStatus::OnRental,
            EquipmentStatusFilter::All => true,
        }
    }
}

impl std::fmt::Display for EquipmentStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentStatusFilter::InOffice => write!(f, "in-office"),
            EquipmentStatusFilter::OnRental => write!(f, "on-rental"),
            EquipmentStatusFilter::All => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_matches() {
        assert!(EquipmentStatusFilter::InOffice.matches(EquipmentStatus::InOffice));
        assert!(!EquipmentStatusFilter::InOffice.matches(EquipmentStatus::OnRental));
        assert!(EquipmentStatusFilter::OnRental.matches(EquipmentStatus::OnRental));
        assert!(EquipmentStatusFilter::All.matches(EquipmentStatus::InOffice));
        assert!(EquipmentStatusFilter::All.matches(EquipmentStatus::OnRental));
    }

    #[test]
    fn test_status_filter_value_names() {
        let parsed = EquipmentStatusFilter::from_str("on-rental", true).unwrap();
        assert_eq!(parsed, EquipmentStatusFilter::OnRental);
        assert_eq!(parsed.to_string(), "on-rental");
    }
}
