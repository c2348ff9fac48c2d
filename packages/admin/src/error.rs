use serde::Deserialize;

/// The single failure shape every API call is reduced to.
///
/// Server errors already arrive as `{"error": "..."}`; transport failures and
/// unexpected bodies are folded into the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}
