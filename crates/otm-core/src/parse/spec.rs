use indexmap::IndexMap;
use serde::Deserialize;

use super::components::Components;
use super::operation::PathItem;

/// A parsed OpenAPI document, reduced to the abstraction the converter
/// consumes: paths with operations plus the component schemas.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApi {
    pub openapi: String,

    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    pub components: Option<Components>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,
}
