//! Entity type definitions

pub mod customer;
pub mod employee;
pub mod equipment;
pub mod rental;

pub use customer::Customer;
pub use employee::{Employee, Role};
pub use equipment::{Equipment, EquipmentStatus};
pub use rental::{DueState, Rental, RentalStatus};
