//! Checkout and return workflow
//!
//! Equipment status and the rental record are two files. Checkout claims the
//! equipment first (compare-and-swap on its revision) and only then writes the
//! rental, so two desks scanning the same item cannot both rent it.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::core::access::Actor;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::store::{Store, StoreError};
use crate::entities::{DueState, Equipment, EquipmentStatus, Rental, RentalStatus};

#[derive(Debug, Error)]
pub enum RentalError {
    #[error("{name} is already on rental ({rental})")]
    AlreadyRented { name: String, rental: String },

    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    #[error("planned return {planned} is before the start date {start}")]
    ReturnBeforeStart { planned: NaiveDate, start: NaiveDate },

    #[error("rental {0} is not active")]
    NotActive(EntityId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything needed to open a rental
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub equipment: EntityId,
    pub customer_name: String,
    pub customer: Option<EntityId>,
    pub location: String,
    pub planned_return: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CheckoutRequest {
    pub fn new(equipment: EntityId, customer_name: impl Into<String>) -> Self {
        Self {
            equipment,
            customer_name: customer_name.into(),
            customer: None,
            location: String::new(),
            planned_return: None,
            notes: None,
        }
    }
}

/// Check an item out
pub fn checkout(
    store: &Store,
    actor: &Actor,
    req: CheckoutRequest,
    now: DateTime<Utc>,
) -> Result<Rental, RentalError> {
    let mut equipment: Equipment = store.get(&req.equipment)?;

    if equipment.is_rented() {
        return Err(RentalError::AlreadyRented {
            name: equipment.name,
            rental: equipment
                .current_rental
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown rental".to_string()),
        });
    }
    if equipment.is_out_of_stock() {
        return Err(RentalError::OutOfStock {
            name: equipment.name,
        });
    }
    if let Some(planned) = req.planned_return {
        let start = now.date_naive();
        if planned < start {
            return Err(RentalError::ReturnBeforeStart { planned, start });
        }
    }

    let rental = Rental {
        id: EntityId::new(EntityPrefix::Rnt),
        equipment: equipment.id.clone(),
        equipment_name: equipment.name.clone(),
        customer: req.customer,
        customer_name: req.customer_name.trim().to_string(),
        location: req.location.trim().to_string(),
        start_date: now,
        planned_return: req.planned_return,
        actual_return: None,
        status: RentalStatus::Active,
        created_by_name: actor.name.clone(),
        created_by_email: actor.email.clone(),
        returned_by: None,
        notes: req.notes,
        entity_revision: 1,
    };

    equipment.status = EquipmentStatus::OnRental;
    equipment.current_rental = Some(rental.id.clone());
    store.update(&mut equipment)?;

    if let Err(e) = store.create(&rental) {
        equipment.status = EquipmentStatus::InOffice;
        equipment.current_rental = None;
        if let Err(revert) = store.update(&mut equipment) {
            tracing::warn!(id = %equipment.id, error = %revert, "failed to release equipment after aborted checkout");
        }
        return Err(e.into());
    }

    tracing::info!(rental = %rental.id, equipment = %equipment.id, "checked out");
    Ok(rental)
}

/// Close an active rental and put its equipment back on the shelf
pub fn check_in(
    store: &Store,
    actor: &Actor,
    rental_ref: &str,
    now: DateTime<Utc>,
) -> Result<Rental, RentalError> {
    let mut rental: Rental = store.find(rental_ref)?;
    if !rental.is_active() {
        return Err(RentalError::NotActive(rental.id));
    }

    rental.status = RentalStatus::Completed;
    rental.actual_return = Some(now);
    rental.returned_by = Some(actor.display().to_string());
    store.update(&mut rental)?;

    match store.get::<Equipment>(&rental.equipment) {
        Ok(mut equipment) => {
            if equipment.current_rental.as_ref() == Some(&rental.id) {
                equipment.status = EquipmentStatus::InOffice;
                equipment.current_rental = None;
                store.update(&mut equipment)?;
            } else {
                tracing::debug!(
                    equipment = %equipment.id,
                    "equipment no longer held by this rental; leaving it as is"
                );
            }
        }
        Err(StoreError::NotFound { .. }) => {
            tracing::warn!(equipment = %rental.equipment, rental = %rental.id, "returned equipment no longer exists");
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(rental = %rental.id, "checked in");
    Ok(rental)
}

/// Active rentals, newest first
pub fn active_rentals(store: &Store) -> Result<Vec<Rental>, StoreError> {
    let mut rentals: Vec<Rental> = store
        .load_all::<Rental>()?
        .into_iter()
        .filter(Rental::is_active)
        .collect();
    rentals.reverse();
    Ok(rentals)
}

/// Active rentals in delivery order: earliest planned return first,
/// unscheduled ones last
pub fn deliveries(store: &Store, today: NaiveDate) -> Result<Vec<(Rental, DueState)>, StoreError> {
    let mut rentals: Vec<Rental> = store
        .load_all::<Rental>()?
        .into_iter()
        .filter(Rental::is_active)
        .collect();
    rentals.sort_by_key(|r| (r.planned_return.is_none(), r.planned_return, r.start_date));
    Ok(rentals
        .into_iter()
        .map(|r| {
            let state = r.due_state(today);
            (r, state)
        })
        .collect())
}
