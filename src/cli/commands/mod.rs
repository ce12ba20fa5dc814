//! CLI command implementations

pub mod completions;
pub mod cust;
pub mod dash;
pub mod emp;
pub mod eqp;
pub mod init;
pub mod rent;
pub mod scan;
pub mod validate;
