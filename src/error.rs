//! Error types for mongo-typegen.
//!
//! Inference itself is infallible; everything that can fail lives at the
//! edges: reading documents, loading configuration, writing output.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain documents. Surfaced unchanged; nothing here retries.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("could not connect to MongoDB at {uri}: {source}")]
    Connect { uri: String, source: mongodb::error::Error },

    #[error("failed to list collections: {0}")]
    ListCollections(#[source] mongodb::error::Error),

    #[error("failed to sample collection '{collection}': {source}")]
    Query { collection: String, source: mongodb::error::Error },

    #[error("collection '{0}' not found")]
    UnknownCollection(String),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid input pattern: {0}")]
    Pattern(String),

    #[error("jq filter failed: {0}")]
    Jq(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config file {path} at {at}: {message}")]
    Parse { path: PathBuf, at: String, message: String },

    #[error("sample size must be between 1 and {max}, got {got}")]
    SampleSize { got: usize, max: usize },

    #[error("a database name is required (--db or \"db\" in the config file)")]
    MissingDatabase,
}

/// The main error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
