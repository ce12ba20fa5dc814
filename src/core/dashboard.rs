//! Front-desk summary

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::store::{Store, StoreError};
use crate::entities::{Customer, Equipment, Rental};

/// Rows shown in each highlight list
pub const HIGHLIGHT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueItem {
    pub rental: String,
    pub equipment_name: String,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAlert {
    pub equipment: String,
    pub name: String,
    pub stock: u32,
}

/// Headline counts plus short highlight lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_equipment: usize,
    pub rented_equipment: usize,
    pub active_rentals: usize,
    pub due_today: usize,
    pub total_customers: usize,
    pub due_today_items: Vec<DueItem>,
    pub out_of_stock: Vec<StockAlert>,
}

impl Summary {
    pub fn compute(store: &Store, today: NaiveDate) -> Result<Self, StoreError> {
        let equipment = store.load_all::<Equipment>()?;
        let rentals: Vec<Rental> = store
            .load_all::<Rental>()?
            .into_iter()
            .filter(Rental::is_active)
            .collect();
        let total_customers = store.load_all::<Customer>()?.len();

        let due: Vec<&Rental> = rentals.iter().filter(|r| r.is_due_today(today)).collect();

        Ok(Self {
            total_equipment: equipment.len(),
            rented_equipment: equipment.iter().filter(|e| e.is_rented()).count(),
            active_rentals: rentals.len(),
            due_today: due.len(),
            total_customers,
            due_today_items: due
                .iter()
                .take(HIGHLIGHT_LIMIT)
                .map(|r| DueItem {
                    rental: r.id.to_string(),
                    equipment_name: r.equipment_name.clone(),
                    customer_name: r.customer_name.clone(),
                })
                .collect(),
            out_of_stock: equipment
                .iter()
                .filter(|e| e.is_out_of_stock())
                .take(HIGHLIGHT_LIMIT)
                .map(|e| StockAlert {
                    equipment: e.id.to_string(),
                    name: e.name.clone(),
                    stock: e.stock,
                })
                .collect(),
        })
    }
}
