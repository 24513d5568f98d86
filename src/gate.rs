//! The gate: a single-point, stateless decision for privileged affordances.

#[cfg(feature = "audit")]
use log::debug;

use crate::{
    capability::{Capability, CapabilitySet},
    role::Role,
};

/// Grounds on which an action or view element may be permitted.
///
/// Real call sites usually check several alternative grounds for the same
/// action ("admin, or holds the capability, or is in an allowed class"), so
/// requirements compose with [`Requirement::AnyOf`] and [`Requirement::AllOf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The account holds the capability.
    Capability(Capability),
    /// The session is currently displaying as this role.
    ActiveRole(Role),
    /// The account's class label is on the allow-list.
    ClassOneOf(Vec<String>),
    /// At least one of the alternatives holds.
    AnyOf(Vec<Requirement>),
    /// Every requirement holds.
    AllOf(Vec<Requirement>),
}

impl Requirement {
    /// Convenience shorthand for "admin role or this capability", the most
    /// common call-site composition.
    pub fn admin_or(capability: Capability) -> Self {
        Requirement::AnyOf(vec![
            Requirement::ActiveRole(Role::Admin),
            Requirement::Capability(capability),
        ])
    }
}

/// Contextual attributes supplied by the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateContext {
    /// Class label to evaluate allow-lists against. Falls back to the
    /// capability set's own role info when absent.
    pub class_label: Option<String>,
}

impl GateContext {
    /// An empty context.
    pub fn none() -> Self {
        Self::default()
    }

    /// A context carrying a class label.
    pub fn with_class(label: impl Into<String>) -> Self {
        Self {
            class_label: Some(label.into()),
        }
    }
}

/// The stateless decision function consulted before rendering or executing
/// a privileged action.
///
/// All state lives with the callers: the gate holds nothing and caches
/// nothing, so it is safe to evaluate on every render and a decision can
/// never go stale across a role switch. The decision is a pure function of
/// (active role, capability set, context).
#[derive(Debug, Clone, Copy, Default)]
pub struct Gate;

impl Gate {
    /// Decide whether the requirement holds for the current session state.
    pub fn is_allowed(
        active_role: Role,
        capabilities: &CapabilitySet,
        requirement: &Requirement,
        context: &GateContext,
    ) -> bool {
        let allowed = Self::evaluate(active_role, capabilities, requirement, context);

        #[cfg(feature = "audit")]
        if !allowed {
            debug!("Gate denied {requirement:?} for active role '{active_role}'");
        }

        allowed
    }

    fn evaluate(
        active_role: Role,
        capabilities: &CapabilitySet,
        requirement: &Requirement,
        context: &GateContext,
    ) -> bool {
        match requirement {
            Requirement::Capability(capability) => capabilities.is_granted(*capability),
            Requirement::ActiveRole(role) => active_role == *role,
            Requirement::ClassOneOf(labels) => {
                let class_label = context
                    .class_label
                    .as_deref()
                    .or(capabilities.role_info().class_label.as_deref());
                match class_label {
                    Some(label) => labels.iter().any(|l| l == label),
                    None => false,
                }
            }
            Requirement::AnyOf(alternatives) => alternatives
                .iter()
                .any(|r| Self::evaluate(active_role, capabilities, r, context)),
            Requirement::AllOf(requirements) => requirements
                .iter()
                .all(|r| Self::evaluate(active_role, capabilities, r, context)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::RoleInfo;

    fn student_caps(class_label: &str) -> CapabilitySet {
        CapabilitySet::empty()
            .grant(Capability::EditOwnProfile)
            .with_role_info(RoleInfo {
                class_label: Some(class_label.to_string()),
                supervised_class: None,
            })
    }

    #[test]
    fn test_capability_requirement() {
        let caps = CapabilitySet::empty().grant(Capability::CreateShoot);

        assert!(Gate::is_allowed(
            Role::Student,
            &caps,
            &Requirement::Capability(Capability::CreateShoot),
            &GateContext::none(),
        ));
        assert!(!Gate::is_allowed(
            Role::Student,
            &caps,
            &Requirement::Capability(Capability::ManageUsers),
            &GateContext::none(),
        ));
    }

    #[test]
    fn test_active_role_requirement() {
        let caps = CapabilitySet::full();

        assert!(Gate::is_allowed(
            Role::Admin,
            &caps,
            &Requirement::ActiveRole(Role::Admin),
            &GateContext::none(),
        ));
        // An admin displaying as a student is not, for gating purposes, an admin.
        assert!(!Gate::is_allowed(
            Role::Student,
            &caps,
            &Requirement::ActiveRole(Role::Admin),
            &GateContext::none(),
        ));
    }

    #[test]
    fn test_or_composition_true_if_any_ground_holds() {
        let requirement = Requirement::AnyOf(vec![
            Requirement::ActiveRole(Role::Admin),
            Requirement::Capability(Capability::CreateShoot),
            Requirement::ClassOneOf(vec!["9.F".to_string()]),
        ]);

        // Only the capability ground holds.
        let caps = CapabilitySet::empty().grant(Capability::CreateShoot);
        assert!(Gate::is_allowed(
            Role::Student,
            &caps,
            &requirement,
            &GateContext::none(),
        ));

        // Only the class allow-list ground holds.
        assert!(Gate::is_allowed(
            Role::Student,
            &student_caps("9.F"),
            &requirement,
            &GateContext::none(),
        ));

        // Only the role ground holds.
        assert!(Gate::is_allowed(
            Role::Admin,
            &CapabilitySet::empty(),
            &requirement,
            &GateContext::none(),
        ));

        // No ground holds.
        assert!(!Gate::is_allowed(
            Role::Student,
            &student_caps("10.A"),
            &requirement,
            &GateContext::none(),
        ));
    }

    #[test]
    fn test_all_of_composition() {
        let requirement = Requirement::AllOf(vec![
            Requirement::ActiveRole(Role::Admin),
            Requirement::Capability(Capability::ManageUsers),
        ]);

        assert!(Gate::is_allowed(
            Role::Admin,
            &CapabilitySet::full(),
            &requirement,
            &GateContext::none(),
        ));
        assert!(!Gate::is_allowed(
            Role::Student,
            &CapabilitySet::full(),
            &requirement,
            &GateContext::none(),
        ));
    }

    #[test]
    fn test_context_class_label_takes_precedence() {
        let requirement = Requirement::ClassOneOf(vec!["9.F".to_string()]);

        // Role info says 10.A, but the call site supplies 9.F.
        assert!(Gate::is_allowed(
            Role::Student,
            &student_caps("10.A"),
            &requirement,
            &GateContext::with_class("9.F"),
        ));

        // Without a context label, role info decides.
        assert!(!Gate::is_allowed(
            Role::Student,
            &student_caps("10.A"),
            &requirement,
            &GateContext::none(),
        ));
    }

    #[test]
    fn test_empty_set_denies_every_check() {
        let caps = CapabilitySet::empty();
        for capability in Capability::ALL {
            assert!(!Gate::is_allowed(
                Role::Student,
                &caps,
                &Requirement::Capability(capability),
                &GateContext::none(),
            ));
        }
    }

    #[test]
    fn test_admin_or_shorthand() {
        let requirement = Requirement::admin_or(Capability::CreateShoot);

        assert!(Gate::is_allowed(
            Role::Admin,
            &CapabilitySet::empty(),
            &requirement,
            &GateContext::none(),
        ));
        assert!(Gate::is_allowed(
            Role::Student,
            &CapabilitySet::empty().grant(Capability::CreateShoot),
            &requirement,
            &GateContext::none(),
        ));
        assert!(!Gate::is_allowed(
            Role::Student,
            &CapabilitySet::empty(),
            &requirement,
            &GateContext::none(),
        ));
    }
}
