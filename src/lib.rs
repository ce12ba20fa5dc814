//! gear: plain-text equipment rental desk
//!
//! Equipment, rentals, customers and staff are kept as YAML files in a
//! project directory. Items carry a 5-character short code for labels and
//! scanners.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
pub mod yaml;
