use indexmap::IndexMap;
use serde::Deserialize;

/// Which composition keyword a composed schema uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposedKind {
    AllOf,
    OneOf,
    AnyOf,
}

impl ComposedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposedKind::AllOf => "allOf",
            ComposedKind::OneOf => "oneOf",
            ComposedKind::AnyOf => "anyOf",
        }
    }
}

/// A JSON Schema node as it appears in an OpenAPI document. `$ref` is folded
/// into the node instead of a separate wrapper type; the converter dispatches
/// on [`Schema::is_ref`] before anything else.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,

    pub format: Option<String>,

    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    pub description: Option<String>,

    #[serde(rename = "default")]
    pub default_value: Option<serde_json::Value>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub deprecated: bool,

    // Object properties
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,

    #[serde(default)]
    pub required: Vec<String>,

    // Array items
    pub items: Option<Box<Schema>>,

    // Composition
    #[serde(rename = "allOf", default)]
    pub all_of: Vec<Schema>,

    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<Schema>,

    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<Schema>,

    // Enum values
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    // Numeric constraints
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    #[serde(rename = "exclusiveMinimum", default)]
    pub exclusive_minimum: bool,
    #[serde(rename = "exclusiveMaximum", default)]
    pub exclusive_maximum: bool,

    // String constraints
    #[serde(rename = "minLength")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    pub pattern: Option<String>,

    // Array constraints
    #[serde(rename = "minItems")]
    pub min_items: Option<u64>,
    #[serde(rename = "maxItems")]
    pub max_items: Option<u64>,
}

impl Schema {
    pub fn is_ref(&self) -> bool {
        self.ref_path.is_some()
    }

    pub fn composed_kind(&self) -> Option<ComposedKind> {
        if !self.all_of.is_empty() {
            Some(ComposedKind::AllOf)
        } else if !self.one_of.is_empty() {
            Some(ComposedKind::OneOf)
        } else if !self.any_of.is_empty() {
            Some(ComposedKind::AnyOf)
        } else {
            None
        }
    }

    pub fn is_composed(&self) -> bool {
        self.composed_kind().is_some()
    }

    pub fn composed_items(&self) -> &[Schema] {
        match self.composed_kind() {
            Some(ComposedKind::AllOf) => &self.all_of,
            Some(ComposedKind::OneOf) => &self.one_of,
            Some(ComposedKind::AnyOf) => &self.any_of,
            None => &[],
        }
    }

    pub fn is_array(&self) -> bool {
        self.schema_type.as_deref() == Some("array")
    }

    pub fn is_object(&self) -> bool {
        self.schema_type.as_deref() == Some("object")
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self.schema_type.as_deref(),
            Some("boolean" | "integer" | "number" | "string")
        )
    }

    /// No declared type and not a ref/composed schema.
    pub fn is_untyped(&self) -> bool {
        self.schema_type.is_none() && !self.is_ref() && !self.is_composed()
    }

    /// Enum values as strings. Non-string values are rendered via their JSON
    /// representation.
    pub fn enum_strings(&self) -> Vec<String> {
        self.enum_values
            .iter()
            .map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_composed_kind() {
        let yaml = "allOf:\n  - type: object\n  - type: object\n";
        let schema: Schema = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(schema.composed_kind(), Some(ComposedKind::AllOf));
        assert_eq!(schema.composed_items().len(), 2);
        assert!(!schema.is_untyped());
    }

    #[test]
    fn detects_untyped() {
        let schema: Schema = serde_yaml_ng::from_str("description: anything\n").unwrap();
        assert!(schema.is_untyped());
        assert!(!schema.is_primitive());
    }

    #[test]
    fn ref_is_not_untyped() {
        let schema: Schema = serde_yaml_ng::from_str("$ref: '#/components/schemas/Foo'\n").unwrap();
        assert!(schema.is_ref());
        assert!(!schema.is_untyped());
    }
}
