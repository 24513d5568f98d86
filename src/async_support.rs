//! Async session wrapper (requires the 'async' feature).

use crate::{
    capability::CapabilitySet,
    error::Result,
    gate::{Gate, GateContext, Requirement},
    profile::{LoadToken, ProfileCell},
    resolver::{AccountRecord, PermissionResolver},
    role::Role,
    store::{RoleStore, RoleSwitch},
};
use std::sync::Arc;
use tokio::sync::RwLock;

struct SessionParts {
    store: RoleStore,
    profile: ProfileCell,
}

/// Async wrapper bundling the role store and the profile cell for callers
/// living on a tokio runtime.
pub struct AsyncAccessSession {
    inner: Arc<RwLock<SessionParts>>,
}

impl Default for AsyncAccessSession {
    fn default() -> Self {
        Self::new(PermissionResolver::new())
    }
}

impl AsyncAccessSession {
    /// Create a session resolving capabilities through the given resolver.
    pub fn new(resolver: PermissionResolver) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionParts {
                store: RoleStore::new(),
                profile: ProfileCell::new(resolver),
            })),
        }
    }

    /// Set the actual role exactly once; later calls are silent no-ops.
    pub async fn initialize(&self, actual: Role) {
        let parts = self.inner.write().await;
        parts.store.initialize(actual);
    }

    /// The account's actual role.
    pub async fn actual_role(&self) -> Option<Role> {
        let parts = self.inner.read().await;
        parts.store.actual_role()
    }

    /// The role currently being displayed.
    pub async fn active_role(&self) -> Option<Role> {
        let parts = self.inner.read().await;
        parts.store.active_role()
    }

    /// Switch the displayed role, returning the navigation effect.
    pub async fn set_active_role(&self, role: Role) -> Result<RoleSwitch> {
        let parts = self.inner.write().await;
        parts.store.set_active_role(role)
    }

    /// The current capability set.
    pub async fn capabilities(&self) -> CapabilitySet {
        let parts = self.inner.read().await;
        parts.profile.capabilities()
    }

    /// Start a profile load, superseding any load still in flight.
    pub async fn begin_load(&self) -> LoadToken {
        let parts = self.inner.read().await;
        parts.profile.begin_load()
    }

    /// Complete a load with the fetched account record.
    pub async fn complete(&self, token: &LoadToken, record: &AccountRecord) -> bool {
        let parts = self.inner.write().await;
        parts.profile.complete(token, record)
    }

    /// Record that the latest load failed, dropping to the empty set.
    pub async fn fail(&self, token: &LoadToken) -> bool {
        let parts = self.inner.write().await;
        parts.profile.fail(token)
    }

    /// Run a fetch future under a fresh load token and install its result,
    /// unless a later load superseded this one in the meantime.
    pub async fn load_profile<F, Fut>(&self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccountRecord>>,
    {
        let token = self.begin_load().await;
        match fetch().await {
            Ok(record) => self.complete(&token, &record).await,
            Err(_) => self.fail(&token).await,
        }
    }

    /// Evaluate a gate requirement against the current session state.
    ///
    /// Denies while no role is active or no capability set has loaded.
    pub async fn is_allowed(&self, requirement: &Requirement, context: &GateContext) -> bool {
        let parts = self.inner.read().await;
        let Some(active) = parts.store.active_role() else {
            return false;
        };
        Gate::is_allowed(active, &parts.profile.capabilities(), requirement, context)
    }

    /// Reset the role store and discard capabilities on logout.
    pub async fn reset(&self) {
        let parts = self.inner.write().await;
        parts.store.reset();
        parts.profile.clear();
    }
}

impl Clone for AsyncAccessSession {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::resolver::DESIGNATED_MEDIA_COHORT;

    #[tokio::test]
    async fn test_async_session_flow() {
        let session = AsyncAccessSession::default();
        session.initialize(Role::Student).await;

        let loaded = session
            .load_profile(|| async {
                Ok(AccountRecord::with_role("student").with_class(DESIGNATED_MEDIA_COHORT))
            })
            .await;
        assert!(loaded);

        assert!(
            session
                .is_allowed(
                    &Requirement::Capability(Capability::CreateShoot),
                    &GateContext::none()
                )
                .await
        );
    }

    #[tokio::test]
    async fn test_checks_deny_before_any_load() {
        let session = AsyncAccessSession::default();
        session.initialize(Role::Admin).await;

        assert!(
            !session
                .is_allowed(
                    &Requirement::Capability(Capability::ManageUsers),
                    &GateContext::none()
                )
                .await
        );
    }

    #[tokio::test]
    async fn test_checks_deny_without_active_role() {
        let session = AsyncAccessSession::default();

        assert!(
            !session
                .is_allowed(
                    &Requirement::ActiveRole(Role::Student),
                    &GateContext::none()
                )
                .await
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let session = AsyncAccessSession::default();
        let clone = session.clone();

        session.initialize(Role::Admin).await;
        assert_eq!(clone.active_role().await, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_reset_clears_both_parts() {
        let session = AsyncAccessSession::default();
        session.initialize(Role::Admin).await;
        session
            .load_profile(|| async { Ok(AccountRecord::with_role("admin")) })
            .await;

        session.reset().await;

        assert_eq!(session.active_role().await, None);
        assert!(session.capabilities().await.is_empty());
    }
}
