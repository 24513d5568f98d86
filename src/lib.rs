//! # Studio Access
//!
//! Role-based access and permission gating for a school media-program
//! portal: decide which views and actions are available to the signed-in
//! account under the role it is currently displaying as.
//!
//! ## Features
//!
//! - Closed role and capability enumerations (no stringly-typed lookups)
//! - Total capability sets derived deterministically from profile records
//! - Fail-closed resolution for missing or malformed account data
//! - Additive cohort rules granting single extra capabilities
//! - A stateless, OR-composable gate safe to evaluate on every render
//! - Initialize-once role store with validated role switching
//! - Navigation effects returned as values, executed by the caller
//! - Stale-response guard for overlapping asynchronous profile loads
//! - Audit logging of switches, resolutions, and denials
//!
//! ## Quick Start
//!
//! ```rust
//! use studio_access::{
//!     AccountRecord, Capability, Gate, GateContext, PermissionResolver, Requirement, Role,
//!     RoleStore,
//! };
//!
//! // Resolve the account's capabilities from its profile record.
//! let resolver = PermissionResolver::new();
//! let record = AccountRecord::with_role("student").with_class("9.F");
//! let caps = resolver.resolve(&record);
//!
//! // Track the session's displayed role.
//! let store = RoleStore::new();
//! store.initialize(Role::Student);
//!
//! // Gate a privileged affordance before rendering it.
//! let can_create = Gate::is_allowed(
//!     store.active_role().unwrap(),
//!     &caps,
//!     &Requirement::admin_or(Capability::CreateShoot),
//!     &GateContext::none(),
//! );
//! assert!(can_create);
//! ```
//!
//! ## Audit Logging
//!
//! When the `audit` feature is enabled (the default), security-relevant
//! events are logged through the standard Rust logging framework. To enable
//! output:
//!
//! ```rust
//! use studio_access::init_audit_logger;
//!
//! // Initialize logging (must be called early in program execution)
//! init_audit_logger();
//!
//! // Configure log level through RUST_LOG environment variable:
//! // RUST_LOG=info,studio_access=debug
//! ```
//!
//! The following events are logged:
//! - Role store initialization and resets
//! - Accepted and rejected role switches
//! - Capability resolution and fail-closed fallbacks
//! - Discarded stale profile loads (at debug level)
//! - Denied gate checks (at debug level)

#[cfg(feature = "audit")]
pub fn init_audit_logger() {
    env_logger::init();
}

pub mod capability;
pub mod error;
pub mod gate;
pub mod macros;
pub mod navigation;
pub mod profile;
pub mod resolver;
pub mod role;
pub mod session;
pub mod store;

#[cfg(feature = "async")]
pub mod async_support;

// Re-export main types for convenience
pub use crate::{
    capability::{Capability, CapabilitySet, RoleInfo},
    error::{Error, Result},
    gate::{Gate, GateContext, Requirement},
    navigation::{Navigator, RecordingNavigator, landing_path},
    profile::{LoadToken, ProfileCell},
    resolver::{
        AccountRecord, ClassAssignment, CohortGrant, DESIGNATED_MEDIA_COHORT, PermissionResolver,
    },
    role::Role,
    session::AuthSession,
    store::{RoleStore, RoleSwitch, SubscriptionId},
};

#[cfg(feature = "async")]
pub use crate::async_support::AsyncAccessSession;
