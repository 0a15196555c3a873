use serde::Deserialize;

use super::schema::Schema;

/// An operation parameter. The location is kept as the raw `in` string; the
/// converter rejects unknown locations.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub deprecated: bool,

    pub description: Option<String>,

    pub schema: Option<Schema>,
}
