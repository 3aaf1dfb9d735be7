#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    OpenId(#[from] openid::error::Error),
    #[error("Failed to retrieve scopes: {0}")]
    Other(String),
}
