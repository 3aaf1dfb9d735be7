use crate::role::CoreSecurityRole;
use std::fmt::{Display, Formatter};

/// An authority granted to an authenticated user, e.g. `ROLE_VIEW`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    /// Create the authority of a role, using the provided prefix.
    pub fn for_role(prefix: &str, role: CoreSecurityRole) -> Self {
        Self(format!("{prefix}{}", role.key()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GrantedAuthority {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for GrantedAuthority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GrantedAuthority> for String {
    fn from(value: GrantedAuthority) -> Self {
        value.0
    }
}
