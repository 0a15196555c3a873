use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid $ref format: {0}")]
    InvalidRefFormat(String),

    #[error("$ref target not found: {0}")]
    RefTargetNotFound(String),
}

/// Syntax error in a mapping DSL string. Always carries the position of the
/// offending fragment.
#[derive(Debug, Error)]
#[error("mapping syntax error at line {line}, column {column}: {detail} in \"{input}\"")]
pub struct MappingDslError {
    pub line: usize,
    pub column: usize,
    pub detail: String,
    pub input: String,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The (type, format) pair of a schema is not convertible.
    #[error("unknown schema '{name}' of type '{schema_type}' (format: {format:?})")]
    UnknownDataType {
        name: String,
        schema_type: String,
        format: Option<String>,
    },

    /// More than one mapping rule matched at the same precedence level.
    #[error("ambiguous type mapping for '{name}', matching targets: {targets:?}")]
    AmbiguousTypeMapping { name: String, targets: Vec<String> },

    #[error("unknown location '{location}' of parameter '{name}'")]
    UnknownParameterLocation { name: String, location: String },

    #[error("multipart request body of '{path}' must be an object schema")]
    MultipartBodyNotObject { path: String },
}

impl ConvertError {
    /// Errors that abandon only the current endpoint instead of the whole run.
    pub fn is_endpoint_recoverable(&self) -> bool {
        matches!(
            self,
            ConvertError::UnknownDataType { .. } | ConvertError::MultipartBodyNotObject { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to parse mapping YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error(transparent)]
    Dsl(#[from] MappingDslError),

    #[error("unsupported mapping format version: {0}")]
    UnsupportedVersion(String),
}
