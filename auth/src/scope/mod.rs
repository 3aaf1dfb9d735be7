//! Providers for the OAuth2 scopes of the current access token.

mod error;
mod openid;

pub use self::error::*;
pub use self::openid::*;

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

/// A provider for the scopes granted to the current access token.
///
/// Implementations may perform network I/O. Errors are handed to the caller as they are, no retry or timeout is
/// applied on top of the provider.
#[async_trait]
pub trait ScopeProvider: Send + Sync + Debug {
    /// Get the scopes of the current access token, `None` if the token carries no scopes at all.
    async fn current_scopes(&self) -> Result<Option<HashSet<String>>, Error>;
}

/// A scope provider which does not provide scopes.
#[derive(Debug, Clone, Copy)]
pub struct NoScopeProvider;

#[async_trait]
impl ScopeProvider for NoScopeProvider {
    async fn current_scopes(&self) -> Result<Option<HashSet<String>>, Error> {
        Ok(None)
    }
}

#[async_trait]
impl<T> ScopeProvider for Option<T>
where
    T: ScopeProvider,
{
    async fn current_scopes(&self) -> Result<Option<HashSet<String>>, Error> {
        match self {
            None => Ok(None),
            Some(provider) => provider.current_scopes().await,
        }
    }
}

#[async_trait]
impl<T> ScopeProvider for Arc<T>
where
    T: ScopeProvider + ?Sized,
{
    async fn current_scopes(&self) -> Result<Option<HashSet<String>>, Error> {
        self.as_ref().current_scopes().await
    }
}

/// A fixed set of scopes.
#[async_trait]
impl ScopeProvider for HashSet<String> {
    async fn current_scopes(&self) -> Result<Option<HashSet<String>>, Error> {
        Ok(Some(self.clone()))
    }
}

/// Split an OAuth2 `scope` attribute (space separated) into its scopes.
pub fn parse_scopes(scope: &str) -> HashSet<String> {
    scope.split_whitespace().map(ToString::to_string).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn no_scopes() -> Result<(), Error> {
        assert_eq!(NoScopeProvider.current_scopes().await?, None);
        assert_eq!(None::<NoScopeProvider>.current_scopes().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn fixed_scopes() -> Result<(), Error> {
        let scopes = parse_scopes("view create");
        let provider: Arc<dyn ScopeProvider> = Arc::new(Some(scopes.clone()));
        assert_eq!(provider.current_scopes().await?, Some(scopes));
        Ok(())
    }

    #[test]
    fn parse() {
        assert_eq!(
            parse_scopes(" openid  view\tCREATE "),
            HashSet::from(["openid".to_string(), "view".to_string(), "CREATE".to_string()])
        );
        assert!(parse_scopes("").is_empty());
    }
}
