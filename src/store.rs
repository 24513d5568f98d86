//! Session-scoped role state: the actual role and the displayed role.

#[cfg(feature = "audit")]
use log::{info, warn};

use crate::{
    error::{Error, Result},
    navigation::{Navigator, landing_path},
    role::Role,
};
use dashmap::DashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Identifier of a role-change subscription.
pub type SubscriptionId = Uuid;

type Subscriber = Box<dyn Fn(Role) + Send + Sync>;

/// The navigation effect of an accepted role switch.
///
/// `set_active_role` returns the new state and this effect together; the
/// caller executes the effect (directly or through a [`Navigator`]), which
/// keeps the state transition itself pure and testable without a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSwitch {
    /// The role now being displayed.
    pub role: Role,
    /// The canonical landing path for that role's default view.
    pub navigate_to: &'static str,
}

/// Holds the account's actual role (immutable once loaded) and the role
/// currently displayed in the UI (switchable), and notifies subscribers on
/// change.
///
/// The store is an explicitly-owned instance meant to be injected into the
/// view layer, one per session. There is exactly one writer of the active
/// role: this store.
pub struct RoleStore {
    actual: RwLock<Option<Role>>,
    active: RwLock<Option<Role>>,
    subscribers: DashMap<SubscriptionId, Subscriber>,
}

impl std::fmt::Debug for RoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleStore")
            .field("actual", &self.actual_role())
            .field("active", &self.active_role())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for RoleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleStore {
    /// Create an uninitialized role store.
    pub fn new() -> Self {
        Self {
            actual: RwLock::new(None),
            active: RwLock::new(None),
            subscribers: DashMap::new(),
        }
    }

    /// Set the actual role exactly once; the active role defaults to it.
    ///
    /// Calling again with the store already initialized is a silent no-op,
    /// so a late asynchronous profile load cannot clobber a role switch the
    /// user made in the meantime.
    pub fn initialize(&self, actual: Role) {
        let mut slot = self.actual.write().unwrap();
        if slot.is_some() {
            #[cfg(feature = "audit")]
            info!("Ignoring repeated role store initialization with '{actual}'");
            return;
        }
        *slot = Some(actual);
        *self.active.write().unwrap() = Some(actual);

        #[cfg(feature = "audit")]
        info!("Role store initialized with actual role '{actual}'");
    }

    /// Whether `initialize` has been called.
    pub fn is_initialized(&self) -> bool {
        self.actual.read().unwrap().is_some()
    }

    /// The account's actual role.
    pub fn actual_role(&self) -> Option<Role> {
        *self.actual.read().unwrap()
    }

    /// The role currently being displayed.
    pub fn active_role(&self) -> Option<Role> {
        *self.active.read().unwrap()
    }

    /// Switch the displayed role.
    ///
    /// The switch is validated against the account's assumable roles; on
    /// rejection the state is left unchanged. On success subscribers are
    /// notified and the navigation effect is returned for the caller to
    /// execute; an accepted switch carries exactly one such effect.
    pub fn set_active_role(&self, role: Role) -> Result<RoleSwitch> {
        let actual = self.actual_role().ok_or(Error::NotInitialized)?;

        if !actual.can_assume(role) {
            #[cfg(feature = "audit")]
            warn!("Rejected switch to role '{role}' for account role '{actual}'");
            return Err(Error::UnauthorizedRoleSwitch {
                requested: role,
                actual,
            });
        }

        *self.active.write().unwrap() = Some(role);

        #[cfg(feature = "audit")]
        info!("Active role switched to '{role}'");

        for subscriber in self.subscribers.iter() {
            subscriber.value()(role);
        }

        Ok(RoleSwitch {
            role,
            navigate_to: landing_path(role),
        })
    }

    /// Switch the displayed role and execute the navigation effect.
    pub fn switch_with(&self, role: Role, navigator: &dyn Navigator) -> Result<RoleSwitch> {
        let switch = self.set_active_role(role)?;
        navigator.navigate(switch.navigate_to);
        Ok(switch)
    }

    /// Register a callback invoked with the new role after each accepted
    /// switch.
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(Role) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.subscribers.insert(id, Box::new(subscriber));
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Clear both roles on logout. The store may be initialized again for
    /// the next session.
    pub fn reset(&self) {
        *self.actual.write().unwrap() = None;
        *self.active.write().unwrap() = None;

        #[cfg(feature = "audit")]
        info!("Role store reset");
    }
}
