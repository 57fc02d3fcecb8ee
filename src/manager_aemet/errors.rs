use std::fmt;
use thiserror::Error;

/// Classification of the `estado` codes AEMET OpenData documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    NotFound,
    RateLimited,
    Unknown,
}

impl ApiErrorKind {
    pub fn from_code(code: i64) -> ApiErrorKind {
        match code {
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimited,
            _ => ApiErrorKind::Unknown,
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiErrorKind::Unauthorized => "unauthorized access, a valid AEMET OpenData API key is needed in the API key file",
            ApiErrorKind::NotFound => "municipality not found",
            ApiErrorKind::RateLimited => "too many requests, try again later",
            ApiErrorKind::Unknown => "undocumented error",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

#[derive(Error, Debug)]
pub enum AemetError {
    #[error("http request error: {0}")]
    Network(String),
    #[error("AEMET error {code}: {kind}")]
    Api { code: i64, kind: ApiErrorKind },
    #[error("json document error: {0}")]
    Document(String),
}

impl AemetError {
    pub fn api(code: i64) -> AemetError {
        AemetError::Api { code, kind: ApiErrorKind::from_code(code) }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            AemetError::Api { code, kind } => format!("Error {}: {}", code, kind.user_message()),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for AemetError {
    fn from(e: serde_json::Error) -> AemetError {
        AemetError::Document(e.to_string())
    }
}
impl From<ureq::Error> for AemetError {
    fn from(e: ureq::Error) -> AemetError {
        AemetError::Network(e.to_string())
    }
}
