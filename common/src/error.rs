//! Error information, as reported to clients.

/// The body of an error response.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorInformation {
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl ErrorInformation {
    pub fn new(error: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            error: error.into(),
            message: message.to_string(),
            details: Default::default(),
        }
    }
}
