use indexmap::IndexMap;
use serde::Deserialize;

use super::schema::Schema;

/// A media type entry of a request body or response content map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,

    /// Per-property encodings of a multipart body.
    #[serde(default)]
    pub encoding: IndexMap<String, Encoding>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Encoding {
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
}
