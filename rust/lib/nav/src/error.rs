use std::path::PathBuf;

use thiserror::Error;

/// A descriptor that does not satisfy the route schema.
///
/// Every variant carries the route of the offending descriptor as written
/// (possibly empty when the route itself is the missing field).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("descriptor {route:?}: missing required field `{field}`")]
    MissingField { route: String, field: &'static str },

    #[error("descriptor {route:?}: invalid type {value:?}, expected folder, tab or view")]
    InvalidType { route: String, value: String },

    #[error("descriptor {route:?}: route must start with '/'")]
    InvalidRoute { route: String },

    #[error("duplicate route: {route}")]
    DuplicateRoute { route: String },

    #[error("descriptor {route:?}: view requires a filePath")]
    MissingFilePath { route: String },
}

impl SchemaError {
    /// Route of the descriptor that failed validation.
    pub fn route(&self) -> &str {
        match self {
            SchemaError::MissingField { route, .. }
            | SchemaError::InvalidType { route, .. }
            | SchemaError::InvalidRoute { route }
            | SchemaError::DuplicateRoute { route }
            | SchemaError::MissingFilePath { route } => route,
        }
    }
}

/// Failure while aggregating descriptors into a registry.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{origin}: {source}")]
    Schema {
        origin: String,
        #[source]
        source: SchemaError,
    },
}

impl LoadError {
    /// The schema violation behind this error, if that is what it is.
    pub fn schema(&self) -> Option<&SchemaError> {
        match self {
            LoadError::Schema { source, .. } => Some(source),
            _ => None,
        }
    }
}
