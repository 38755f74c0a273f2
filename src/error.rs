//! Error types for choreography extraction.
//!
//! A missing handler is never an error: it shows up as an empty interaction
//! tree. Errors are reserved for an analyzed model that is inconsistent with
//! itself, where any diagram we could draw would be a guess.

use thiserror::Error;

/// Errors that can occur while loading a catalog or extracting choreography.
#[derive(Error, Debug)]
pub enum ChoreoError {
    #[error("type not found in catalog: {name}")]
    UnknownType { name: String },
    #[error("no type in catalog implements interface {interface}")]
    NoImplementation { interface: String },
    #[error("publish call {method} has no argument at position {position}")]
    MissingPublishedArgument { method: String, position: usize },
    #[error("invalid conventions: {0}")]
    InvalidConventions(String),
    #[error("invalid message pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("failed to parse catalog: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("failed to parse conventions: {0}")]
    Conventions(#[from] serde_yaml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ChoreoError>;
