use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;

/// A response with its content map keyed by content type. An empty content
/// map is a response without a body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}
