//! Deserialization of the mapping configuration and conversion of its
//! entries into mapping rules. The textual entries go through the mapping
//! DSL parser, so a malformed entry fails with a positioned error.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::config::ApiOptions;
use crate::error::{MappingDslError, MappingError};
use crate::mapping::dsl::{parse_mapping, MappingKind, ParsedMapping};
use crate::mapping::rules::{
    AddParameterTypeMapping, AnnotationTypeMapping, EndpointTypeMapping, Mapping,
    MappingAnnotation, NullTypeMapping, ParameterTypeMapping, ResponseTypeMapping, ResultStyle,
    ResultTypeMapping, TypeMapping,
};
use crate::parse::HttpMethod;

const SUPPORTED_VERSION: &str = "v2";

/// Read a mapping configuration from YAML.
pub fn from_yaml(yaml: &str) -> Result<ApiOptions, MappingError> {
    let config: MappingConfig = serde_yaml_ng::from_str(yaml)?;
    if config.version != SUPPORTED_VERSION {
        return Err(MappingError::UnsupportedVersion(config.version));
    }

    let mut options = ApiOptions::default();
    if let Some(package_name) = config.options.package_name {
        options.package_name = package_name;
    }
    if let Some(model_name_suffix) = config.options.model_name_suffix {
        options.model_name_suffix = model_name_suffix;
    }
    options.type_mappings = convert_map(&config.map)?;
    Ok(options)
}

#[derive(Debug, Deserialize)]
struct MappingConfig {
    #[serde(rename = "openapi-processor-mapping")]
    version: String,
    #[serde(default)]
    options: OptionsConfig,
    #[serde(default)]
    map: MapConfig,
}

#[derive(Debug, Deserialize, Default)]
struct OptionsConfig {
    #[serde(rename = "package-name")]
    package_name: Option<String>,
    #[serde(rename = "model-name-suffix")]
    model_name_suffix: Option<String>,
}

/// The shared shape of the global `map:` section, a path subsection and a
/// method subsection.
#[derive(Debug, Deserialize, Default)]
struct ScopedMappings {
    result: Option<String>,
    #[serde(rename = "result-style")]
    result_style: Option<ResultStyle>,
    single: Option<String>,
    multi: Option<String>,
    #[serde(rename = "null")]
    null: Option<String>,
    #[serde(default)]
    types: Vec<TypeEntry>,
    #[serde(default)]
    parameters: Vec<ParameterEntry>,
    #[serde(default)]
    responses: Vec<ResponseEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct MapConfig {
    #[serde(flatten)]
    scope: ScopedMappings,
    #[serde(default)]
    paths: IndexMap<String, PathEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct PathEntry {
    #[serde(default)]
    exclude: bool,
    #[serde(flatten)]
    scope: ScopedMappings,
    get: Option<ScopedMappings>,
    put: Option<ScopedMappings>,
    post: Option<ScopedMappings>,
    delete: Option<ScopedMappings>,
    options: Option<ScopedMappings>,
    head: Option<ScopedMappings>,
    patch: Option<ScopedMappings>,
    trace: Option<ScopedMappings>,
}

impl PathEntry {
    fn methods(&self) -> Vec<(HttpMethod, &ScopedMappings)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, scope)| scope.as_ref().map(|s| (method, s)))
        .collect()
    }
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    #[serde(rename = "type")]
    mapping: String,
    #[serde(default)]
    generics: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParameterEntry {
    Name {
        name: String,
        #[serde(default)]
        generics: Vec<String>,
    },
    Add {
        add: String,
        #[serde(default)]
        generics: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ResponseEntry {
    content: String,
    #[serde(default)]
    generics: Vec<String>,
}

fn convert_map(map: &MapConfig) -> Result<Vec<Mapping>, MappingError> {
    let mut mappings = convert_scope(&map.scope)?;

    for (path, entry) in &map.paths {
        let mut path_mappings = convert_scope(&entry.scope)?;
        if let Some(null) = &entry.scope.null {
            path_mappings.push(convert_null(null));
        }
        mappings.push(Mapping::Endpoint(EndpointTypeMapping {
            path: path.clone(),
            method: None,
            mappings: path_mappings,
            exclude: entry.exclude,
        }));

        for (method, scope) in entry.methods() {
            let mut method_mappings = convert_scope(scope)?;
            if let Some(null) = &scope.null {
                method_mappings.push(convert_null(null));
            }
            mappings.push(Mapping::Endpoint(EndpointTypeMapping {
                path: path.clone(),
                method: Some(method),
                mappings: method_mappings,
                exclude: false,
            }));
        }
    }

    Ok(mappings)
}

fn convert_scope(scope: &ScopedMappings) -> Result<Vec<Mapping>, MappingError> {
    let mut mappings = Vec::new();

    if let Some(result) = &scope.result {
        let parsed = parse_mapping(result)?;
        mappings.push(Mapping::ResultWrapper(ResultTypeMapping {
            target_type_name: require_target(&parsed, result)?,
        }));
    }
    if let Some(style) = scope.result_style {
        mappings.push(Mapping::ResultStyle(style));
    }
    if let Some(single) = &scope.single {
        mappings.push(convert_wrapper("single", single)?);
    }
    if let Some(multi) = &scope.multi {
        mappings.push(convert_wrapper("multi", multi)?);
    }

    for entry in &scope.types {
        convert_type_entry(entry, &mut mappings)?;
    }

    for entry in &scope.parameters {
        match entry {
            ParameterEntry::Name { name, generics } => {
                let parsed = parse_mapping(name)?;
                let mut mapping = type_mapping_of(&parsed, name)?;
                merge_generics(&mut mapping, generics);
                mappings.push(Mapping::Parameter(ParameterTypeMapping {
                    parameter_name: require_source(&parsed, name)?,
                    mapping,
                }));
            }
            ParameterEntry::Add { add, generics } => {
                let parsed = parse_mapping(add)?;
                let mut mapping = type_mapping_of(&parsed, add)?;
                merge_generics(&mut mapping, generics);
                mappings.push(Mapping::AddParameter(AddParameterTypeMapping {
                    parameter_name: require_source(&parsed, add)?,
                    mapping,
                    annotation: annotation_of(&parsed),
                }));
            }
        }
    }

    for entry in &scope.responses {
        let parsed = parse_mapping(&entry.content)?;
        let mut mapping = type_mapping_of(&parsed, &entry.content)?;
        merge_generics(&mut mapping, &entry.generics);
        mappings.push(Mapping::Response(ResponseTypeMapping {
            content_type: require_source(&parsed, &entry.content)?,
            mapping,
        }));
    }

    Ok(mappings)
}

/// A `types:` entry yields a type rule, an annotation in the entry yields an
/// additional annotation rule. An annotate-only entry (`Foo @ ...`) yields
/// just the annotation rule.
fn convert_type_entry(entry: &TypeEntry, mappings: &mut Vec<Mapping>) -> Result<(), MappingError> {
    let parsed = parse_mapping(&entry.mapping)?;

    if parsed.kind == MappingKind::Annotate {
        let source = require_source(&parsed, &entry.mapping)?;
        if let Some(annotation) = annotation_of(&parsed) {
            mappings.push(Mapping::Annotation(AnnotationTypeMapping {
                source_type_name: source,
                source_type_format: parsed.source_format.clone(),
                annotation,
            }));
        }
        return Ok(());
    }

    let mut mapping = type_mapping_of(&parsed, &entry.mapping)?;
    merge_generics(&mut mapping, &entry.generics);
    mappings.push(Mapping::Type(mapping));

    if let Some(annotation) = annotation_of(&parsed) {
        mappings.push(Mapping::Annotation(AnnotationTypeMapping {
            source_type_name: require_source(&parsed, &entry.mapping)?,
            source_type_format: parsed.source_format.clone(),
            annotation,
        }));
    }
    Ok(())
}

/// A `single:`/`multi:` entry is a target-only mapping keyed by the wrapper
/// name.
fn convert_wrapper(wrapper: &str, input: &str) -> Result<Mapping, MappingError> {
    let parsed = parse_mapping(input)?;
    Ok(Mapping::Type(TypeMapping {
        source_type_name: Some(wrapper.to_string()),
        source_type_format: None,
        target_type_name: require_target(&parsed, input)?,
        generic_type_names: parsed.target_generic_types,
    }))
}

/// A `null:` entry is a target with an optional initializer, e.g.
/// `io.x.JsonNullable = JsonNullable.undefined()`.
fn convert_null(input: &str) -> Mapping {
    let (target, undefined) = match input.split_once('=') {
        Some((target, undefined)) => (target.trim(), Some(undefined.trim().to_string())),
        None => (input.trim(), None),
    };
    Mapping::NullWrapper(NullTypeMapping {
        target_type_name: target.to_string(),
        undefined,
    })
}

/// A `generics:` sub-key only applies when the DSL itself carries no
/// generic arguments.
fn merge_generics(mapping: &mut TypeMapping, generics: &[String]) {
    if mapping.generic_type_names.is_empty() {
        mapping.generic_type_names = generics.to_vec();
    }
}

fn type_mapping_of(parsed: &ParsedMapping, input: &str) -> Result<TypeMapping, MappingError> {
    Ok(TypeMapping {
        source_type_name: parsed.source_type.clone(),
        source_type_format: parsed.source_format.clone(),
        target_type_name: require_target(parsed, input)?,
        generic_type_names: parsed.target_generic_types.clone(),
    })
}

fn annotation_of(parsed: &ParsedMapping) -> Option<MappingAnnotation> {
    parsed.annotation_type.as_ref().map(|type_name| MappingAnnotation {
        type_name: type_name.clone(),
        parameters: parsed.annotation_parameters.clone(),
    })
}

fn require_target(parsed: &ParsedMapping, input: &str) -> Result<String, MappingError> {
    parsed
        .target_type
        .clone()
        .ok_or_else(|| missing(input, "missing target type"))
}

fn require_source(parsed: &ParsedMapping, input: &str) -> Result<String, MappingError> {
    parsed
        .source_type
        .clone()
        .ok_or_else(|| missing(input, "missing source name"))
}

fn missing(input: &str, detail: &str) -> MappingError {
    MappingError::Dsl(MappingDslError {
        line: 1,
        column: 1,
        detail: detail.to_string(),
        input: input.to_string(),
    })
}
