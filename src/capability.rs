//! Capability definitions and the total capability set.

use crate::error::Error;
use std::collections::HashSet;

/// A single named permission flag.
///
/// The set of capabilities is closed: every consumer and every test
/// enumerates the same finite list, so a mistyped name is a compile error
/// rather than a lookup that silently resolves to "false".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create a shoot (filming session) record.
    CreateShoot,
    /// Manage portal user accounts.
    ManageUsers,
    /// Manage studio equipment inventory.
    ManageEquipment,
    /// Approve absence justifications for a supervised class.
    ApproveJustifications,
    /// View attendance and activity reports for a supervised class.
    ViewClassReports,
    /// Edit the account's own profile.
    EditOwnProfile,
}

impl Capability {
    /// Every capability flag defined in the system.
    pub const ALL: [Capability; 6] = [
        Capability::CreateShoot,
        Capability::ManageUsers,
        Capability::ManageEquipment,
        Capability::ApproveJustifications,
        Capability::ViewClassReports,
        Capability::EditOwnProfile,
    ];

    /// Get the string representation of the capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CreateShoot => "create_shoot",
            Capability::ManageUsers => "manage_users",
            Capability::ManageEquipment => "manage_equipment",
            Capability::ApproveJustifications => "approve_justifications",
            Capability::ViewClassReports => "view_class_reports",
            Capability::EditOwnProfile => "edit_own_profile",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownCapability(s.to_string()))
    }
}

/// Structured role information carried alongside the capability flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleInfo {
    /// Display label of the class the account belongs to (students).
    pub class_label: Option<String>,
    /// Display label of the class the account supervises (class teachers).
    pub supervised_class: Option<String>,
}

/// The total, always-defined mapping from capability to granted/denied for
/// the current account.
///
/// A capability lookup can never return "unknown": the enum is closed and
/// absence of evidence is "false". The empty set doubles as the state before
/// any profile has loaded, so callers holding it deny every privileged
/// affordance rather than allowing by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CapabilitySet {
    granted: HashSet<Capability>,
    role_info: RoleInfo,
}

impl CapabilitySet {
    /// Create an empty capability set. Every lookup against it is denied.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a capability set with every flag granted.
    pub fn full() -> Self {
        Self {
            granted: Capability::ALL.into_iter().collect(),
            role_info: RoleInfo::default(),
        }
    }

    /// Grant a capability.
    pub fn grant(mut self, capability: Capability) -> Self {
        self.granted.insert(capability);
        self
    }

    /// Grant a capability in place.
    pub fn grant_mut(&mut self, capability: Capability) {
        self.granted.insert(capability);
    }

    /// Revoke a capability in place.
    pub fn revoke_mut(&mut self, capability: Capability) {
        self.granted.remove(&capability);
    }

    /// Check whether a capability is granted. Total: always a definite bool.
    pub fn is_granted(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    /// Check whether every capability in the system is granted.
    pub fn is_full(&self) -> bool {
        Capability::ALL.into_iter().all(|c| self.is_granted(c))
    }

    /// Get the granted capabilities.
    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        self.granted.iter().copied()
    }

    /// Get the number of granted capabilities.
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    /// Check if no capability is granted.
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Attach structured role information.
    pub fn with_role_info(mut self, role_info: RoleInfo) -> Self {
        self.role_info = role_info;
        self
    }

    /// Get the structured role information.
    pub fn role_info(&self) -> &RoleInfo {
        &self.role_info
    }

    /// Merge another capability set's grants into this one.
    pub fn merge(&mut self, other: &CapabilitySet) {
        for capability in other.granted() {
            self.granted.insert(capability);
        }
    }
}

/// JSON snapshot helpers for caching a resolved capability set.
#[cfg(feature = "persistence")]
impl CapabilitySet {
    /// Serialize the set to a JSON snapshot.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a set from a JSON snapshot.
    pub fn from_json(snapshot: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_denies_everything() {
        let caps = CapabilitySet::empty();
        for capability in Capability::ALL {
            assert!(!caps.is_granted(capability));
        }
        assert!(caps.is_empty());
    }

    #[test]
    fn test_full_set_grants_everything() {
        let caps = CapabilitySet::full();
        for capability in Capability::ALL {
            assert!(caps.is_granted(capability));
        }
        assert!(caps.is_full());
    }

    #[test]
    fn test_grant_and_revoke() {
        let mut caps = CapabilitySet::empty().grant(Capability::CreateShoot);
        assert!(caps.is_granted(Capability::CreateShoot));
        assert!(!caps.is_granted(Capability::ManageUsers));
        assert_eq!(caps.len(), 1);

        caps.revoke_mut(Capability::CreateShoot);
        assert!(!caps.is_granted(Capability::CreateShoot));
        assert!(caps.is_empty());
    }

    #[test]
    fn test_merge_is_additive() {
        let mut a = CapabilitySet::empty().grant(Capability::EditOwnProfile);
        let b = CapabilitySet::empty()
            .grant(Capability::EditOwnProfile)
            .grant(Capability::CreateShoot);

        a.merge(&b);
        assert_eq!(a.len(), 2);
        assert!(a.is_granted(Capability::CreateShoot));
    }

    #[test]
    fn test_role_info_attachment() {
        let caps = CapabilitySet::empty().with_role_info(RoleInfo {
            class_label: Some("9.F".to_string()),
            supervised_class: None,
        });

        assert_eq!(caps.role_info().class_label.as_deref(), Some("9.F"));
        assert!(caps.role_info().supervised_class.is_none());
    }

    #[test]
    fn test_capability_parsing() {
        assert_eq!(
            "create_shoot".parse::<Capability>().unwrap(),
            Capability::CreateShoot
        );
        assert!(matches!(
            "launch_rocket".parse::<Capability>(),
            Err(Error::UnknownCapability(_))
        ));
    }

    #[test]
    fn test_capability_display_round_trip() {
        for capability in Capability::ALL {
            assert_eq!(
                capability.as_str().parse::<Capability>().unwrap(),
                capability
            );
        }
    }

    #[cfg(feature = "persistence")]
    #[test]
    fn test_snapshot_round_trip() {
        let caps = CapabilitySet::empty()
            .grant(Capability::CreateShoot)
            .with_role_info(RoleInfo {
                class_label: Some("9.F".to_string()),
                supervised_class: None,
            });

        let snapshot = caps.to_json().unwrap();
        let restored = CapabilitySet::from_json(&snapshot).unwrap();
        assert_eq!(restored, caps);
    }
}
