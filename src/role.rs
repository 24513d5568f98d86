//! Role definitions and the role-assumption rule.

use crate::error::Error;

/// The account-level classification of a portal user.
///
/// Exactly one role is *actual* per session (derived from the authenticated
/// account). A second, independent *active* role may be selected for viewing
/// purposes; see [`crate::store::RoleStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Portal administrator.
    Admin,
    /// Supervising teacher of a class.
    ClassTeacher,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Every role known to the system.
    pub const ALL: [Role; 3] = [Role::Admin, Role::ClassTeacher, Role::Student];

    /// Get the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ClassTeacher => "class-teacher",
            Role::Student => "student",
        }
    }

    /// Check if this is the administrator role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Check if this is the class-teacher role.
    pub fn is_class_teacher(&self) -> bool {
        matches!(self, Role::ClassTeacher)
    }

    /// Check if this is the student role.
    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }

    /// The roles an account with this actual role may display as.
    ///
    /// Viewing is downward-only: an administrator may display as any role,
    /// a class teacher additionally as a student, and a student only as
    /// itself. An account can never display as a role it does not hold in
    /// this sense.
    pub fn assumable_roles(&self) -> &'static [Role] {
        match self {
            Role::Admin => &Role::ALL,
            Role::ClassTeacher => &[Role::ClassTeacher, Role::Student],
            Role::Student => &[Role::Student],
        }
    }

    /// Check whether an account with this actual role may display as `other`.
    pub fn can_assume(&self, other: Role) -> bool {
        self.assumable_roles().contains(&other)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "class-teacher" | "class_teacher" => Ok(Role::ClassTeacher),
            "student" => Ok(Role::Student),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}
