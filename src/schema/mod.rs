//! Schema module - record validation and label templates

pub mod registry;
pub mod template;
pub mod validator;

pub use registry::SchemaRegistry;
pub use template::{LabelRenderer, TemplateError};
pub use validator::{ValidationError, Validator, Violation};
