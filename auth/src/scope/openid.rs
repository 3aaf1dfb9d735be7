use super::{parse_scopes, Error, ScopeProvider};
use async_trait::async_trait;
use core::fmt::{self, Debug, Formatter};
use std::{collections::HashSet, sync::Arc};
use tokio::sync::RwLock;
use url::Url;

/// Check if something (a token) expires soon.
pub trait Expires {
    /// Check if the token expires before now plus `duration`.
    fn expires_before(&self, duration: chrono::Duration) -> bool;
}

impl Expires for openid::Bearer {
    fn expires_before(&self, duration: chrono::Duration) -> bool {
        match self.expires {
            Some(expires) => expires - chrono::Utc::now() <= duration,
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
#[command(rename_all_env = "SCREAMING_SNAKE_CASE", next_help_heading = "OAuth2 scopes")]
pub struct OpenIdScopeProviderConfigArguments {
    /// The client ID used to request access tokens
    #[arg(id = "scopes-client-id", long = "scopes-client-id", env = "SCOPES_OIDC_CLIENT_ID")]
    pub client_id: String,

    /// The client secret used to request access tokens
    #[arg(id = "scopes-client-secret", long = "scopes-client-secret", env = "SCOPES_OIDC_CLIENT_SECRET")]
    pub client_secret: String,

    /// The issuer URL of the SSO server
    #[arg(id = "scopes-issuer-url", long = "scopes-issuer-url", env = "SCOPES_OIDC_ISSUER_URL")]
    pub issuer_url: Url,

    /// Duration before the expiration of a token at which it will be refreshed
    #[arg(
        id = "scopes-refresh-before",
        long = "scopes-refresh-before",
        env = "SCOPES_OIDC_REFRESH_BEFORE",
        default_value = "30s"
    )]
    pub refresh_before: humantime::Duration,
}

impl OpenIdScopeProviderConfigArguments {
    /// Discover the issuer and create a new provider.
    pub async fn into_provider(self) -> anyhow::Result<OpenIdScopeProvider> {
        log::debug!("Discovering OpenID issuer: {}", self.issuer_url);
        let client = openid::Client::discover(self.client_id, self.client_secret, None, self.issuer_url).await?;

        Ok(OpenIdScopeProvider::new(
            client,
            chrono::Duration::from_std(*self.refresh_before)?,
        ))
    }
}

/// A provider which reports the scopes of an access token, requested using the client credentials grant.
///
/// The token is kept until it is about to expire.
#[derive(Clone)]
pub struct OpenIdScopeProvider {
    pub client: Arc<openid::Client>,
    current_token: Arc<RwLock<Option<openid::Bearer>>>,
    refresh_before: chrono::Duration,
}

impl Debug for OpenIdScopeProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenIdScopeProvider")
            .field("client", &self.client.client_id)
            .field("current_token", &"...")
            .field("refresh_before", &self.refresh_before)
            .finish()
    }
}

impl OpenIdScopeProvider {
    /// Create a new provider using the provided client.
    pub fn new(client: openid::Client, refresh_before: chrono::Duration) -> Self {
        Self {
            client: Arc::new(client),
            current_token: Arc::new(RwLock::new(None)),
            refresh_before,
        }
    }

    /// Get a token whose scopes can be reported, requesting a new one if the cached one expires soon.
    ///
    /// Concurrent callers wait for a single request.
    pub async fn token(&self) -> Result<openid::Bearer, openid::error::Error> {
        if let Some(token) = unexpired(self.current_token.read().await.as_ref(), self.refresh_before) {
            return Ok(token);
        }

        let mut cached = self.current_token.write().await;
        if let Some(token) = unexpired(cached.as_ref(), self.refresh_before) {
            log::debug!("Token got replaced while waiting");
            return Ok(token);
        }

        let token = match cached.take() {
            Some(expiring) if expiring.refresh_token.is_some() => {
                log::debug!("Refreshing expiring token");
                self.client.refresh_token(expiring, None).await?
            }
            _ => {
                log::debug!("Requesting token using client credentials");
                self.client.request_token_using_client_credentials(None).await?
            }
        };

        *cached = Some(token.clone());
        Ok(token)
    }
}

/// The cached token, unless it expires within `refresh_before`.
fn unexpired(token: Option<&openid::Bearer>, refresh_before: chrono::Duration) -> Option<openid::Bearer> {
    token.filter(|token| !token.expires_before(refresh_before)).cloned()
}

/// The scopes granted to the token, `None` if it carries no `scope` attribute.
fn scopes_of(token: &openid::Bearer) -> Option<HashSet<String>> {
    token.scope.as_deref().map(parse_scopes)
}

#[async_trait]
impl ScopeProvider for OpenIdScopeProvider {
    async fn current_scopes(&self) -> Result<Option<HashSet<String>>, Error> {
        let token = self.token().await?;
        log::debug!("Token scopes: {:?}", token.scope);
        Ok(scopes_of(&token))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;
    use rstest::rstest;
    use serde_json::json;

    fn bearer(token: serde_json::Value) -> Result<openid::Bearer, serde_json::Error> {
        serde_json::from_value(token)
    }

    fn expiring_in(seconds: Option<i64>) -> Result<openid::Bearer, serde_json::Error> {
        let mut token = bearer(json!({"access_token": "token"}))?;
        token.expires = seconds.map(|seconds| chrono::Utc::now() + chrono::Duration::seconds(seconds));
        Ok(token)
    }

    #[test]
    fn scopes_of_token() -> Result<(), serde_json::Error> {
        let token = bearer(json!({"access_token": "token", "scope": "view Create"}))?;
        assert_eq!(
            scopes_of(&token),
            Some(HashSet::from(["view".to_string(), "Create".to_string()]))
        );
        Ok(())
    }

    #[test]
    fn scopes_of_token_without_scope() -> Result<(), serde_json::Error> {
        let token = bearer(json!({"access_token": "token"}))?;
        assert_eq!(scopes_of(&token), None);
        Ok(())
    }

    #[rstest]
    #[case::expired(Some(-60), true)]
    #[case::within_margin(Some(10), true)]
    #[case::beyond_margin(Some(3600), false)]
    #[case::no_expiration(None, false)]
    fn token_expires_before(#[case] seconds: Option<i64>, #[case] expected: bool) -> Result<(), serde_json::Error> {
        let token = expiring_in(seconds)?;
        assert_eq!(token.expires_before(chrono::Duration::seconds(30)), expected);
        Ok(())
    }

    #[rstest]
    #[case::missing(None, false)]
    #[case::expiring(Some(10), false)]
    #[case::valid(Some(3600), true)]
    fn reuse_unexpired_token(#[case] seconds: Option<i64>, #[case] reused: bool) -> Result<(), serde_json::Error> {
        let cached = match seconds {
            Some(seconds) => Some(expiring_in(Some(seconds))?),
            None => None,
        };

        let token = unexpired(cached.as_ref(), chrono::Duration::seconds(30));
        assert_eq!(token.is_some(), reused);
        Ok(())
    }

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        scopes: OpenIdScopeProviderConfigArguments,
    }

    #[test]
    fn default_refresh_before() {
        let cli = Cli::parse_from([
            "test",
            "--scopes-client-id",
            "dataflow",
            "--scopes-client-secret",
            "secret",
            "--scopes-issuer-url",
            "http://localhost:8090/realms/dataflow",
        ]);

        assert_eq!(cli.scopes.client_id, "dataflow");
        assert_eq!(*cli.scopes.refresh_before, std::time::Duration::from_secs(30));
    }
}
