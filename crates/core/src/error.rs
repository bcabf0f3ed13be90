//! Error type for fallible fire controller operations
//!
//! Only configuration problems and lookups of fires that no longer exist are
//! errors. Redundant calls (water on a fire that is already going out, ticks
//! after termination) and missing collaborators are absorbed and logged
//! instead.

use crate::core_types::FireId;

/// Errors returned by configuration loading and `FireWorld` lookups
#[derive(Debug, Clone, PartialEq)]
pub enum FireError {
    /// A configuration field holds a value the controller cannot run with
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f32,
        /// What the field must satisfy
        reason: &'static str,
    },
    /// Failed to read a configuration file
    ConfigLoad(String),
    /// Failed to parse configuration contents
    ConfigParse(String),
    /// No live fire has this id (never ignited or already destroyed)
    UnknownFire(FireId),
}

impl std::fmt::Display for FireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FireError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config field '{field}': {reason}, got {value}"),
            FireError::ConfigLoad(msg) => write!(f, "Failed to load config: {msg}"),
            FireError::ConfigParse(msg) => write!(f, "Failed to parse config: {msg}"),
            FireError::UnknownFire(id) => write!(f, "No live fire with id {id}"),
        }
    }
}

impl std::error::Error for FireError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FireError::InvalidConfig {
            field: "water_needed",
            value: -1.0,
            reason: "must be finite and non-negative",
        };
        assert_eq!(
            err.to_string(),
            "Invalid config field 'water_needed': must be finite and non-negative, got -1"
        );
        assert_eq!(
            FireError::UnknownFire(FireId::new(3)).to_string(),
            "No live fire with id fire#3"
        );
    }
}
