use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;

/// A request body with its content map keyed by content type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}
