use std::fmt;
use std::fmt::Formatter;
use log::SetLoggerError;
use thiserror::Error;
use crate::models::location::LocationCodeError;

#[derive(Error, Debug)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}

#[derive(Error, Debug)]
#[error("logging error: {0}")]
pub struct LoggingError(pub String);
impl From<std::io::Error> for LoggingError {
    fn from(e: std::io::Error) -> Self { LoggingError(e.to_string()) }
}
impl From<SetLoggerError> for LoggingError {
    fn from(e: SetLoggerError) -> Self { LoggingError(e.to_string()) }
}

/// Errors loading the bundled population dataset, these are fatal at startup
pub enum PopulationError {
    File(String),
    Document(String),
    Content(String),
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PopulationError::File(e) => write!(f, "PopulationError::File: {}", e),
            PopulationError::Document(e) => write!(f, "PopulationError::Document: {}", e),
            PopulationError::Content(e) => write!(f, "PopulationError::Content: {}", e),
        }
    }
}
impl fmt::Debug for PopulationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
impl std::error::Error for PopulationError {}
impl From<std::io::Error> for PopulationError {
    fn from(e: std::io::Error) -> Self { PopulationError::File(e.to_string()) }
}
impl From<serde_json::Error> for PopulationError {
    fn from(e: serde_json::Error) -> Self { PopulationError::Document(e.to_string()) }
}
impl From<LocationCodeError> for PopulationError {
    fn from(e: LocationCodeError) -> Self { PopulationError::Content(e.to_string()) }
}

#[derive(Error, Debug)]
#[error("unable to save favorite location: {0}")]
pub struct FavoriteError(#[from] pub std::io::Error);

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no entry {index} in a list of {len} locations")]
    OutOfRange { index: usize, len: usize },
    #[error("unknown location code {0}")]
    UnknownLocation(String),
    #[error(transparent)]
    Favorite(#[from] FavoriteError),
}

#[derive(Error, Debug)]
pub enum MeteoInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Population(#[from] PopulationError),
}
