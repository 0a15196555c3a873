//! Conversion options, usually populated from a mapping configuration file.

use crate::mapping::Mapping;

pub const DEFAULT_PACKAGE_NAME: &str = "io.openapiprocessor.generated";

#[derive(Debug)]
pub struct ApiOptions {
    /// root package of the generated types
    pub package_name: String,
    /// suffix appended to generated model and enum class names
    pub model_name_suffix: String,
    pub type_mappings: Vec<Mapping>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            model_name_suffix: String::new(),
            type_mappings: Vec::new(),
        }
    }
}

impl ApiOptions {
    pub fn model_pkg(&self) -> String {
        format!("{}.model", self.package_name)
    }

    pub fn api_pkg(&self) -> String {
        format!("{}.api", self.package_name)
    }

    /// Replace the `{package-name}` placeholder of a mapping target.
    pub fn resolve_package(&self, type_name: &str) -> String {
        type_name.replace("{package-name}", &self.package_name)
    }
}
