//! Convenience macros for the access system.

/// Macro for building a capability set with a clean syntax.
///
/// # Examples
///
/// ```rust
/// use studio_access::{capabilities, Capability};
///
/// let caps = capabilities![Capability::CreateShoot, Capability::EditOwnProfile];
/// assert!(caps.is_granted(Capability::CreateShoot));
/// assert!(!caps.is_granted(Capability::ManageUsers));
/// ```
#[macro_export]
macro_rules! capabilities {
    ($($capability:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut caps = $crate::capability::CapabilitySet::empty();
            $(
                caps.grant_mut($capability);
            )*
            caps
        }
    };
}

/// Macro for composing gate requirements where any alternative suffices.
///
/// # Examples
///
/// ```rust
/// use studio_access::{any_of, Capability, Requirement, Role};
///
/// let requirement = any_of![
///     Requirement::ActiveRole(Role::Admin),
///     Requirement::Capability(Capability::CreateShoot),
/// ];
/// assert!(matches!(requirement, Requirement::AnyOf(_)));
/// ```
#[macro_export]
macro_rules! any_of {
    ($($requirement:expr),* $(,)?) => {
        $crate::gate::Requirement::AnyOf(vec![$($requirement),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::{
        capability::Capability,
        gate::{Gate, GateContext, Requirement},
        role::Role,
    };

    #[test]
    fn test_capabilities_macro() {
        let caps = capabilities![Capability::CreateShoot, Capability::EditOwnProfile];

        assert_eq!(caps.len(), 2);
        assert!(caps.is_granted(Capability::CreateShoot));
        assert!(caps.is_granted(Capability::EditOwnProfile));
    }

    #[test]
    fn test_empty_capabilities_macro() {
        let caps = capabilities![];
        assert!(caps.is_empty());
    }

    #[test]
    fn test_any_of_macro() {
        let requirement = any_of![
            Requirement::ActiveRole(Role::Admin),
            Requirement::Capability(Capability::CreateShoot),
        ];

        let caps = capabilities![Capability::CreateShoot];
        assert!(Gate::is_allowed(
            Role::Student,
            &caps,
            &requirement,
            &GateContext::none()
        ));
        assert!(!Gate::is_allowed(
            Role::Student,
            &capabilities![],
            &requirement,
            &GateContext::none()
        ));
    }
}
