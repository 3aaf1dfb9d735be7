//! Extraction of the authorities granted to an authenticated user.

pub mod config;
mod error;

pub use error::Error;

use crate::{authority::GrantedAuthority, role::CoreSecurityRole, scope::ScopeProvider, ROLE_PREFIX};
use async_trait::async_trait;
use self::config::AuthoritiesConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{Instrument, Span};

/// The claims of an authenticated user.
pub type ClaimsMap = serde_json::Map<String, serde_json::Value>;

/// Extract the authorities of an authenticated user from its claims.
#[async_trait]
pub trait AuthoritiesExtractor: Send + Sync {
    /// Extract the authorities, fails with [`Error::InvalidArgument`] if the claims are absent.
    async fn extract_authorities(&self, claims: Option<&ClaimsMap>) -> Result<Vec<GrantedAuthority>, Error>;
}

/// How roles get mapped to a user.
#[derive(Clone, Debug, Default)]
pub enum RoleMapping {
    /// Grant all roles.
    #[default]
    AllRoles,
    /// Grant only the roles matching a scope of the current access token.
    OAuthScopes(Arc<dyn ScopeProvider>),
}

impl RoleMapping {
    fn name(&self) -> &'static str {
        match self {
            Self::AllRoles => "all-roles",
            Self::OAuthScopes(_) => "oauth-scopes",
        }
    }
}

/// Assigns [`CoreSecurityRole`]s to an authenticated user.
///
/// Using [`RoleMapping::AllRoles`], every role gets granted, in declaration order. Using
/// [`RoleMapping::OAuthScopes`], a role is only granted if its key matches (ignoring case) one of the scopes
/// of the current access token.
///
/// The resulting authorities are logged, together with the claims, in the span of the extractor.
#[derive(Clone, Debug)]
pub struct DefaultAuthoritiesExtractor {
    mapping: RoleMapping,
    role_prefix: String,
    span: Span,
}

impl Default for DefaultAuthoritiesExtractor {
    fn default() -> Self {
        Self::new(RoleMapping::AllRoles)
    }
}

impl DefaultAuthoritiesExtractor {
    pub fn new(mapping: RoleMapping) -> Self {
        let span = tracing::info_span!("authorities", mapping = mapping.name());
        Self {
            mapping,
            role_prefix: ROLE_PREFIX.to_string(),
            span,
        }
    }

    /// Create a new extractor from its configuration.
    ///
    /// Mapping OAuth scopes requires a scope provider.
    pub fn from_config(config: AuthoritiesConfig, scopes: Option<Arc<dyn ScopeProvider>>) -> Result<Self, Error> {
        let mapping = match (config.map_oauth_scopes, scopes) {
            (false, _) => RoleMapping::AllRoles,
            (true, Some(scopes)) => RoleMapping::OAuthScopes(scopes),
            (true, None) => {
                return Err(Error::InvalidArgument(
                    "Mapping OAuth scopes to authorities requires a scope provider".to_string(),
                ))
            }
        };

        Ok(Self::new(mapping).with_role_prefix(config.role_prefix))
    }

    pub fn with_role_prefix(mut self, role_prefix: impl Into<String>) -> Self {
        self.role_prefix = role_prefix.into();
        self
    }

    /// Use the provided span for logging, instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn mapping(&self) -> &RoleMapping {
        &self.mapping
    }

    pub fn role_prefix(&self) -> &str {
        &self.role_prefix
    }

    fn all_roles(&self) -> Vec<GrantedAuthority> {
        CoreSecurityRole::iter()
            .map(|role| GrantedAuthority::for_role(&self.role_prefix, role))
            .collect()
    }

    fn matching_roles(&self, scopes: &HashSet<String>) -> Vec<GrantedAuthority> {
        // a role is granted once, even if the token carries the same scope in different cases
        CoreSecurityRole::iter()
            .filter(|role| scopes.iter().any(|scope| role.matches(scope)))
            .map(|role| GrantedAuthority::for_role(&self.role_prefix, role))
            .collect()
    }
}

#[async_trait]
impl AuthoritiesExtractor for DefaultAuthoritiesExtractor {
    async fn extract_authorities(&self, claims: Option<&ClaimsMap>) -> Result<Vec<GrantedAuthority>, Error> {
        let claims =
            claims.ok_or_else(|| Error::InvalidArgument("The claims argument must not be absent".to_string()))?;

        let authorities = match &self.mapping {
            RoleMapping::AllRoles => self.all_roles(),
            RoleMapping::OAuthScopes(provider) => {
                match provider.current_scopes().instrument(self.span.clone()).await? {
                    Some(scopes) => self.matching_roles(&scopes),
                    None => vec![],
                }
            }
        };

        let roles = authorities
            .iter()
            .map(GrantedAuthority::as_str)
            .collect::<Vec<_>>()
            .join(",");
        tracing::info!(
            parent: &self.span,
            "Adding roles {} to user {}",
            roles,
            serde_json::Value::Object(claims.clone())
        );

        Ok(authorities)
    }
}
