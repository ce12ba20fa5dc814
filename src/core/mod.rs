//! Core module - fundamental types and the rental workflow

pub mod access;
pub mod config;
pub mod dashboard;
pub mod entity;
pub mod identity;
pub mod logging;
pub mod lookup;
pub mod project;
pub mod rental;
pub mod shortcode;
pub mod store;

pub use access::{is_admin, require_admin, AccessError, Actor};
pub use config::Config;
pub use dashboard::Summary;
pub use entity::Entity;
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use lookup::{ensure_in_stock, lookup_equipment, Lookup, LookupError, LookupVia, ShortCodeIndex};
pub use project::{Project, ProjectError};
pub use rental::{check_in, checkout, CheckoutRequest, RentalError};
pub use shortcode::{ShortCode, ShortCodeError};
pub use store::{Store, StoreError};
