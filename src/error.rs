//! Error types for catalog and resolver calls

use thiserror::Error;

use crate::models::CatalogKind;

/// Failure of a catalog list, create or delete call
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("please provide both a name and materials")]
    MissingInput,

    #[error("failed to fetch {kind} recipes: {reason}")]
    Fetch { kind: CatalogKind, reason: String },

    #[error("unexpected response format for {kind} recipes")]
    UnexpectedFormat { kind: CatalogKind },

    #[error("failed to create recipe '{id}': {reason}")]
    Create { id: String, reason: String },

    #[error("failed to delete recipe '{id}': {reason}")]
    Delete { id: String, reason: String },
}

/// Why a breakdown could not be resolved
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed breakdown: {0}")]
    Malformed(String),
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
