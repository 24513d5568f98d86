//! Navigation collaborator used after an accepted role switch.

use crate::role::Role;
use std::sync::RwLock;

/// The canonical landing path for a role's default view.
pub fn landing_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::ClassTeacher => "/my-class",
        Role::Student => "/home",
    }
}

/// A "navigate to path" capability, abstracted so role switching is
/// testable without a real router.
pub trait Navigator: Send + Sync {
    /// Navigate the UI to the given path.
    fn navigate(&self, path: &str);
}

/// Navigator that records every requested path instead of routing.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: RwLock<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a new recording navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The paths navigated to, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.read().unwrap().clone()
    }

    /// Number of navigations performed.
    pub fn len(&self) -> usize {
        self.paths.read().unwrap().len()
    }

    /// Check if no navigation has happened.
    pub fn is_empty(&self) -> bool {
        self.paths.read().unwrap().is_empty()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.write().unwrap().push(path.to_string());
    }
}
