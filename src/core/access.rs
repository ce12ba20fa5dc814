//! Acting user and admin checks
//!
//! Every mutating operation receives the [`Actor`] explicitly; there is no
//! global "current user".

use thiserror::Error;

use crate::core::config::Config;
use crate::entities::Employee;

/// The person operating the desk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub email: Option<String>,
}

impl Actor {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email: email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.author(), config.email().map(String::from))
    }

    /// Name shown in rental records
    pub fn display(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_deref().unwrap_or("unknown")
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("{action} requires admin rights (set 'email' in config to an admin account)")]
    AdminRequired { action: &'static str },
}

/// Check admin rights: listed in `config.admins`, or an employee with that
/// email has the admin role
pub fn is_admin(actor: &Actor, config: &Config, employees: &[Employee]) -> bool {
    let Some(email) = actor.email.as_deref() else {
        return false;
    };
    config.is_listed_admin(email) || employees.iter().any(|e| e.has_email(email) && e.is_admin())
}

/// Fail unless the actor is an admin
pub fn require_admin(
    actor: &Actor,
    config: &Config,
    employees: &[Employee],
    action: &'static str,
) -> Result<(), AccessError> {
    if is_admin(actor, config, employees) {
        Ok(())
    } else {
        tracing::debug!(actor = actor.display(), action, "admin check failed");
        Err(AccessError::AdminRequired { action })
    }
}
