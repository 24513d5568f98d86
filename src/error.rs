//! Error types for the access system.

use thiserror::Error;

/// The main error type for access control operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A role string did not name any known role.
    #[error("Unknown role: '{0}'")]
    UnknownRole(String),

    /// A capability string did not name any known capability.
    #[error("Unknown capability: '{0}'")]
    UnknownCapability(String),

    /// The requested display role is not among the roles the account may assume.
    #[error("Role switch to '{requested}' is not permitted for an account with role '{actual}'")]
    UnauthorizedRoleSwitch {
        /// The role the switch asked for.
        requested: crate::role::Role,
        /// The account's actual role.
        actual: crate::role::Role,
    },

    /// The role store was used before `initialize` was called.
    #[error("Role store has not been initialized")]
    NotInitialized,

    /// A profile payload could not be understood.
    #[error("Malformed profile record: {0}")]
    MalformedProfile(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for access control operations.
pub type Result<T> = std::result::Result<T, Error>;
