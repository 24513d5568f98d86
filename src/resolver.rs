//! Deriving a capability set from an account's profile record.
//!
//! The resolver is the single place where the portal's stored account data
//! is turned into permission flags. It is deterministic and fails closed:
//! any record it cannot fully understand resolves to the empty capability
//! set, never to partial trust, and no error crosses its boundary.
//!
//! Grants are layered:
//!
//! 1. **Base grants** looked up from the account's role.
//! 2. **Cohort rules**, an explicit allow-list evaluated after the base
//!    lookup. Rules grant a single extra capability to students of a named
//!    class, without redefining the student role itself.
//! 3. **Explicit flags** carried on the record, each naming one capability.

#[cfg(feature = "audit")]
use log::{debug, warn};

use crate::{
    capability::{Capability, CapabilitySet, RoleInfo},
    error::{Error, Result},
    role::Role,
};
use std::collections::HashMap;

/// Class label of the media cohort whose students may create shoot records.
pub const DESIGNATED_MEDIA_COHORT: &str = "9.F";

/// Assignment of an account to a class.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClassAssignment {
    /// Display label of the class (e.g. `"9.F"`).
    pub label: String,
}

impl ClassAssignment {
    /// Create a new class assignment.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// The account record served by the profile endpoint.
///
/// Only the `role` field is required for the record to be trusted at all;
/// everything else defaults to absent. Absent evidence resolves to denied.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AccountRecord {
    /// The account's stored role, as a raw string.
    #[serde(default)]
    pub role: Option<String>,
    /// The class the account belongs to or supervises.
    #[serde(default)]
    pub class: Option<ClassAssignment>,
    /// Explicit per-capability flags, each naming one capability.
    #[serde(default)]
    pub flags: HashMap<String, bool>,
}

impl AccountRecord {
    /// Create a record with the given role string.
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Default::default()
        }
    }

    /// Set the class assignment.
    pub fn with_class(mut self, label: impl Into<String>) -> Self {
        self.class = Some(ClassAssignment::new(label));
        self
    }

    /// Set an explicit capability flag.
    pub fn with_flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(name.into(), enabled);
        self
    }

    /// Parse a record from the profile endpoint's JSON payload.
    ///
    /// The payload must be a JSON object; anything else is rejected so the
    /// caller can fall back to the empty capability set.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| Error::MalformedProfile(e.to_string()))?;
        if !value.is_object() {
            return Err(Error::MalformedProfile(format!(
                "expected a JSON object, got {value}"
            )));
        }
        serde_json::from_value(value).map_err(|e| Error::MalformedProfile(e.to_string()))
    }
}

/// An additive allow-list rule: students of the named class receive one
/// extra capability on top of their role's base grants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CohortGrant {
    class_label: String,
    capability: Capability,
}

impl CohortGrant {
    /// Create a cohort grant for the given class label.
    pub fn new(class_label: impl Into<String>, capability: Capability) -> Self {
        Self {
            class_label: class_label.into(),
            capability,
        }
    }

    /// The class label this rule applies to.
    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    /// The capability this rule grants.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    fn applies_to(&self, role: Role, class_label: Option<&str>) -> bool {
        role.is_student() && class_label == Some(self.class_label.as_str())
    }
}

/// Transforms a raw account record into a total [`CapabilitySet`].
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    cohort_grants: Vec<CohortGrant>,
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionResolver {
    /// Create a resolver with the portal's standing cohort rule: the
    /// designated media cohort may create shoot records.
    pub fn new() -> Self {
        Self::with_rules(vec![CohortGrant::new(
            DESIGNATED_MEDIA_COHORT,
            Capability::CreateShoot,
        )])
    }

    /// Create a resolver with no cohort rules.
    pub fn bare() -> Self {
        Self::with_rules(Vec::new())
    }

    /// Create a resolver with a custom set of cohort rules.
    pub fn with_rules(cohort_grants: Vec<CohortGrant>) -> Self {
        Self { cohort_grants }
    }

    /// Add a cohort rule.
    pub fn add_rule(&mut self, rule: CohortGrant) {
        self.cohort_grants.push(rule);
    }

    /// The configured cohort rules.
    pub fn rules(&self) -> &[CohortGrant] {
        &self.cohort_grants
    }

    /// Derive the capability set for an account record.
    ///
    /// A record without a parseable role resolves to the empty set; the
    /// caller always receives a total, safe-to-render result.
    pub fn resolve(&self, record: &AccountRecord) -> CapabilitySet {
        let Some(role_str) = record.role.as_deref() else {
            #[cfg(feature = "audit")]
            warn!("Account record carries no role; resolving to the empty capability set");
            return CapabilitySet::empty();
        };

        let role = match role_str.parse::<Role>() {
            Ok(role) => role,
            Err(_) => {
                #[cfg(feature = "audit")]
                warn!("Account record carries unknown role '{role_str}'; resolving to the empty capability set");
                return CapabilitySet::empty();
            }
        };

        let class_label = record.class.as_ref().map(|c| c.label.as_str());
        let mut caps = Self::base_grants(role).with_role_info(Self::role_info(role, class_label));

        for rule in &self.cohort_grants {
            if rule.applies_to(role, class_label) {
                caps.grant_mut(rule.capability());
            }
        }

        for (name, enabled) in &record.flags {
            if *enabled && let Ok(capability) = name.parse::<Capability>() {
                caps.grant_mut(capability);
            } else if *enabled {
                #[cfg(feature = "audit")]
                warn!("Ignoring unknown capability flag '{name}' on account record");
            }
        }

        #[cfg(feature = "audit")]
        debug!(
            "Resolved role '{role}' (class {class_label:?}) to {} capabilities",
            caps.len()
        );

        caps
    }

    /// Derive the capability set straight from the profile endpoint's JSON.
    ///
    /// Malformed payloads are absorbed into the fail-closed case.
    pub fn resolve_json(&self, payload: &str) -> CapabilitySet {
        match AccountRecord::from_json(payload) {
            Ok(record) => self.resolve(&record),
            Err(_e) => {
                #[cfg(feature = "audit")]
                warn!("Malformed profile payload ({_e}); resolving to the empty capability set");
                CapabilitySet::empty()
            }
        }
    }

    fn base_grants(role: Role) -> CapabilitySet {
        match role {
            Role::Admin => CapabilitySet::full(),
            Role::ClassTeacher => CapabilitySet::empty()
                .grant(Capability::ApproveJustifications)
                .grant(Capability::ViewClassReports)
                .grant(Capability::EditOwnProfile),
            Role::Student => CapabilitySet::empty().grant(Capability::EditOwnProfile),
        }
    }

    fn role_info(role: Role, class_label: Option<&str>) -> RoleInfo {
        match role {
            Role::ClassTeacher => RoleInfo {
                class_label: None,
                supervised_class: class_label.map(str::to_string),
            },
            _ => RoleInfo {
                class_label: class_label.map(str::to_string),
                supervised_class: None,
            },
        }
    }
}
