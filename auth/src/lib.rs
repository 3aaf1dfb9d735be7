//! Assign roles to OAuth2 authenticated users.

pub mod authorities;
pub mod authority;
pub mod role;
pub mod scope;

pub use authorities::{AuthoritiesExtractor, ClaimsMap, DefaultAuthoritiesExtractor, RoleMapping};
pub use authority::GrantedAuthority;
pub use role::CoreSecurityRole;

/// The prefix used for role based authorities, unless configured otherwise.
pub const ROLE_PREFIX: &str = "ROLE_";
