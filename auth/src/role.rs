//! The roles known to the system.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A core security role.
///
/// The set of roles is fixed. The declaration order is the order in which roles get granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoreSecurityRole {
    Create,
    Deploy,
    Destroy,
    Manage,
    Modify,
    Schedule,
    View,
}

impl CoreSecurityRole {
    /// All roles, in declaration order.
    pub const ALL: [CoreSecurityRole; 7] = [
        Self::Create,
        Self::Deploy,
        Self::Destroy,
        Self::Manage,
        Self::Modify,
        Self::Schedule,
        Self::View,
    ];

    /// The stable key of the role, e.g. `VIEW`.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Deploy => "DEPLOY",
            Self::Destroy => "DESTROY",
            Self::Manage => "MANAGE",
            Self::Modify => "MODIFY",
            Self::Schedule => "SCHEDULE",
            Self::View => "VIEW",
        }
    }

    /// A human readable description of the role.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Create => "role for create operations",
            Self::Deploy => "role for deploy operations",
            Self::Destroy => "role for destroy operations",
            Self::Manage => "role for the boot management endpoints",
            Self::Modify => "role for modify operations",
            Self::Schedule => "role for scheduling operations",
            Self::View => "view role",
        }
    }

    /// Iterate over all roles, in declaration order.
    pub fn iter() -> impl Iterator<Item = CoreSecurityRole> {
        Self::ALL.into_iter()
    }

    /// Check if the key of the role matches the value, ignoring case.
    pub fn matches(&self, value: &str) -> bool {
        self.key().eq_ignore_ascii_case(value)
    }
}

impl Display for CoreSecurityRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for CoreSecurityRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|role| role.matches(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
