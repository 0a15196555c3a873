use indexmap::IndexMap;

use crate::parse::HttpMethod;

/// A user-supplied mapping rule. The set is closed; [`leaf_mappings`]
/// flattens scoped containers (endpoint rules) into their nested rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    Type(TypeMapping),
    Annotation(AnnotationTypeMapping),
    Endpoint(EndpointTypeMapping),
    Parameter(ParameterTypeMapping),
    Response(ResponseTypeMapping),
    AddParameter(AddParameterTypeMapping),
    NullWrapper(NullTypeMapping),
    ResultWrapper(ResultTypeMapping),
    ResultStyle(ResultStyle),
}

/// Flatten a rule to its leaf rules: leaf variants yield themselves, endpoint
/// rules yield their nested rules (recursively).
pub fn leaf_mappings(mapping: &Mapping) -> Vec<&Mapping> {
    match mapping {
        Mapping::Endpoint(ep) => ep.mappings.iter().flat_map(leaf_mappings).collect(),
        other => vec![other],
    }
}

/// Maps an OpenAPI source type, identified by name and optional format, to a
/// fully qualified target type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMapping {
    pub source_type_name: Option<String>,
    pub source_type_format: Option<String>,
    pub target_type_name: String,
    pub generic_type_names: Vec<String>,
}

impl TypeMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_type_name: Some(source.into()),
            source_type_format: None,
            target_type_name: target.into(),
            generic_type_names: Vec::new(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.source_type_format = Some(format.into());
        self
    }

    pub fn with_generics(mut self, generics: Vec<String>) -> Self {
        self.generic_type_names = generics;
        self
    }

    pub fn target_type(&self) -> TargetType {
        TargetType {
            type_name: self.target_type_name.clone(),
            generic_names: self.generic_type_names.clone(),
        }
    }
}

/// The fully qualified replacement type of a matched rule.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetType {
    pub type_name: String,
    pub generic_names: Vec<String>,
}

impl TargetType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            generic_names: Vec::new(),
        }
    }

    /// The plain type name, i.e. the last segment of the qualified name.
    pub fn name(&self) -> &str {
        match self.type_name.rsplit_once('.') {
            Some((_, name)) => name,
            None => &self.type_name,
        }
    }

    /// The package part of the qualified name, empty if unqualified.
    pub fn pkg(&self) -> &str {
        match self.type_name.rsplit_once('.') {
            Some((pkg, _)) => pkg,
            None => "",
        }
    }
}

/// Scopes nested rules to a single endpoint path, optionally restricted to
/// one method. `exclude` moves the endpoint to the excluded interface.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointTypeMapping {
    pub path: String,
    pub method: Option<HttpMethod>,
    pub mappings: Vec<Mapping>,
    pub exclude: bool,
}

/// Maps all parameters of a given name to a target type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTypeMapping {
    pub parameter_name: String,
    pub mapping: TypeMapping,
}

/// Maps all responses of a given content type to a target type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTypeMapping {
    pub content_type: String,
    pub mapping: TypeMapping,
}

/// Adds a synthetic parameter that does not exist in the API description.
#[derive(Debug, Clone, PartialEq)]
pub struct AddParameterTypeMapping {
    pub parameter_name: String,
    pub mapping: TypeMapping,
    pub annotation: Option<MappingAnnotation>,
}

/// An annotation attached by a mapping rule, with its ordered parameter map.
/// Unnamed parameters are keyed by the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingAnnotation {
    pub type_name: String,
    pub parameters: IndexMap<String, String>,
}

/// Attaches an annotation to all occurrences of a source type.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTypeMapping {
    pub source_type_name: String,
    pub source_type_format: Option<String>,
    pub annotation: MappingAnnotation,
}

/// Wraps nullable occurrences in a null wrapper type, with an optional
/// "undefined" initializer expression.
#[derive(Debug, Clone, PartialEq)]
pub struct NullTypeMapping {
    pub target_type_name: String,
    pub undefined: Option<String>,
}

impl NullTypeMapping {
    pub fn target_type(&self) -> TargetType {
        TargetType::new(self.target_type_name.clone())
    }
}

/// Wraps response types in a result/envelope type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTypeMapping {
    pub target_type_name: String,
}

impl ResultTypeMapping {
    pub fn target_type(&self) -> TargetType {
        TargetType::new(self.target_type_name.clone())
    }
}

/// Controls the response type of endpoints with multiple responses: all
/// responses as a common super type, or only the success response. Without
/// an explicit rule the success response wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStyle {
    All,
    #[default]
    Success,
}
