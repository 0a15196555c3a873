//! Looks up the mapping rule that applies to a schema, walking scopes from
//! most to least specific: endpoint with exact method, endpoint without a
//! method, global parameter/response rules, global type rules.

use crate::error::ConvertError;
use crate::parse::HttpMethod;

use super::rules::{
    leaf_mappings, AddParameterTypeMapping, AnnotationTypeMapping, Mapping, NullTypeMapping,
    ResultStyle, ResultTypeMapping, TypeMapping,
};

/// The schema facts a mapping rule can match on. Implemented by the
/// converter's schema cursor so the finder stays independent of it.
pub trait MappingSchema {
    fn path(&self) -> &str;
    fn method(&self) -> HttpMethod;
    fn name(&self) -> &str;
    fn content_type(&self) -> Option<&str>;
    fn schema_type(&self) -> Option<&str>;
    fn format(&self) -> Option<&str>;
    fn is_primitive(&self) -> bool;
    fn is_array(&self) -> bool;
}

/// Finds the mapping rules that apply to a given schema.
#[derive(Debug, Default)]
pub struct MappingFinder {
    mappings: Vec<Mapping>,
}

impl MappingFinder {
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    /// The type rule for a schema, or `None`. Scopes are tried in order and
    /// the first scope with a match wins; more than one match within a scope
    /// is an [`ConvertError::AmbiguousTypeMapping`] error.
    pub fn find_type_mapping(
        &self,
        schema: &dyn MappingSchema,
    ) -> Result<Option<TypeMapping>, ConvertError> {
        for scope in self.scopes(schema) {
            if let Some(found) = self.find_io_in(&scope, schema)? {
                return Ok(Some(found));
            }
            if let Some(found) = self.find_type_in(&scope, schema)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// The annotation rule for a schema, or `None`.
    pub fn find_annotation_type_mapping(
        &self,
        schema: &dyn MappingSchema,
    ) -> Result<Option<AnnotationTypeMapping>, ConvertError> {
        for scope in self.scopes(schema) {
            let matches: Vec<&AnnotationTypeMapping> = scope
                .iter()
                .filter_map(|m| match m {
                    Mapping::Annotation(a) => Some(a),
                    _ => None,
                })
                .filter(|a| {
                    (a.source_type_name == schema.name()
                        || Some(a.source_type_name.as_str()) == schema.schema_type())
                        && a.source_type_format.as_deref() == schema.format()
                })
                .collect();
            if let Some(found) = single(matches, schema)? {
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }

    /// The `single:` wrapper rule in effect for the schema's endpoint.
    pub fn find_single_type_mapping(
        &self,
        schema: &dyn MappingSchema,
    ) -> Result<Option<TypeMapping>, ConvertError> {
        self.find_wrapper_type_mapping(schema, "single")
    }

    /// The `multi:` wrapper rule in effect for the schema's endpoint.
    pub fn find_multi_type_mapping(
        &self,
        schema: &dyn MappingSchema,
    ) -> Result<Option<TypeMapping>, ConvertError> {
        self.find_wrapper_type_mapping(schema, "multi")
    }

    /// The `result:` wrapper rule in effect for the schema's endpoint.
    pub fn find_result_type_mapping(
        &self,
        schema: &dyn MappingSchema,
    ) -> Result<Option<ResultTypeMapping>, ConvertError> {
        for scope in self.scopes(schema) {
            let matches: Vec<&ResultTypeMapping> = scope
                .iter()
                .filter_map(|m| match m {
                    Mapping::ResultWrapper(r) => Some(r),
                    _ => None,
                })
                .collect();
            if let Some(found) = single(matches, schema)? {
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }

    /// The `null:` wrapper rule for the schema's endpoint. Null wrapping is
    /// endpoint scoped only, there is no global fallback.
    pub fn find_endpoint_null_type_mapping(
        &self,
        schema: &dyn MappingSchema,
    ) -> Option<NullTypeMapping> {
        for scope in self.endpoint_scopes(schema.path(), schema.method()) {
            let found = scope.iter().find_map(|m| match m {
                Mapping::NullWrapper(n) => Some(n.clone()),
                _ => None,
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// All `add:` parameter rules for an endpoint, endpoint scoped rules
    /// first, then global ones.
    pub fn find_add_parameter_type_mappings(
        &self,
        path: &str,
        method: HttpMethod,
    ) -> Vec<AddParameterTypeMapping> {
        let mut scopes = self.endpoint_scopes(path, method);
        scopes.push(self.global_scope());

        scopes
            .iter()
            .flatten()
            .filter_map(|m| match m {
                Mapping::AddParameter(a) => Some(a.clone()),
                _ => None,
            })
            .collect()
    }

    /// The configured result style, `Success` unless overridden.
    pub fn find_result_style(&self) -> ResultStyle {
        self.mappings
            .iter()
            .find_map(|m| match m {
                Mapping::ResultStyle(style) => Some(*style),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Whether an endpoint is excluded via an `exclude: true` endpoint rule.
    pub fn is_excluded_endpoint(&self, path: &str, method: HttpMethod) -> bool {
        self.mappings.iter().any(|m| match m {
            Mapping::Endpoint(ep) => {
                ep.exclude
                    && ep.path == path
                    && (ep.method.is_none() || ep.method == Some(method))
            }
            _ => false,
        })
    }

    fn find_wrapper_type_mapping(
        &self,
        schema: &dyn MappingSchema,
        wrapper: &str,
    ) -> Result<Option<TypeMapping>, ConvertError> {
        for scope in self.scopes(schema) {
            let matches: Vec<&TypeMapping> = scope
                .iter()
                .filter_map(|m| match m {
                    Mapping::Type(t) => Some(t),
                    _ => None,
                })
                .filter(|t| t.source_type_name.as_deref() == Some(wrapper))
                .collect();
            if let Some(found) = single(matches, schema)? {
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }

    fn find_io_in(
        &self,
        scope: &[&Mapping],
        schema: &dyn MappingSchema,
    ) -> Result<Option<TypeMapping>, ConvertError> {
        let parameters: Vec<&TypeMapping> = scope
            .iter()
            .filter_map(|m| match m {
                Mapping::Parameter(p) if p.parameter_name == schema.name() => Some(&p.mapping),
                _ => None,
            })
            .collect();
        if let Some(found) = single(parameters, schema)? {
            return Ok(Some(found.clone()));
        }

        let responses: Vec<&TypeMapping> = scope
            .iter()
            .filter_map(|m| match m {
                Mapping::Response(r) if Some(r.content_type.as_str()) == schema.content_type() => {
                    Some(&r.mapping)
                }
                _ => None,
            })
            .collect();
        if let Some(found) = single(responses, schema)? {
            return Ok(Some(found.clone()));
        }

        Ok(None)
    }

    /// Type rules within one scope, tried by match strength: exact name and
    /// format, then declared primitive type and format, then the literal
    /// `array` source name.
    fn find_type_in(
        &self,
        scope: &[&Mapping],
        schema: &dyn MappingSchema,
    ) -> Result<Option<TypeMapping>, ConvertError> {
        let types: Vec<&TypeMapping> = scope
            .iter()
            .filter_map(|m| match m {
                Mapping::Type(t) => Some(t),
                _ => None,
            })
            .collect();

        let named: Vec<&TypeMapping> = types
            .iter()
            .copied()
            .filter(|t| {
                t.source_type_name.as_deref() == Some(schema.name())
                    && t.source_type_format.as_deref() == schema.format()
            })
            .collect();
        if let Some(found) = single(named, schema)? {
            return Ok(Some(found.clone()));
        }

        if schema.is_primitive() {
            let primitives: Vec<&TypeMapping> = types
                .iter()
                .copied()
                .filter(|t| {
                    t.source_type_name.as_deref() == schema.schema_type()
                        && t.source_type_format.as_deref() == schema.format()
                })
                .collect();
            if let Some(found) = single(primitives, schema)? {
                return Ok(Some(found.clone()));
            }
        }

        if schema.is_array() {
            // array rules ignore the format on purpose
            let arrays: Vec<&TypeMapping> = types
                .iter()
                .copied()
                .filter(|t| t.source_type_name.as_deref() == Some("array"))
                .collect();
            if let Some(found) = single(arrays, schema)? {
                return Ok(Some(found.clone()));
            }
        }

        Ok(None)
    }

    /// All scopes that apply to a schema, most specific first.
    fn scopes(&self, schema: &dyn MappingSchema) -> Vec<Vec<&Mapping>> {
        let mut scopes = self.endpoint_scopes(schema.path(), schema.method());
        scopes.push(self.global_scope());
        scopes
    }

    /// The endpoint scopes for a path: exact method match first, then the
    /// method-less endpoint rules.
    fn endpoint_scopes(&self, path: &str, method: HttpMethod) -> Vec<Vec<&Mapping>> {
        let exact: Vec<&Mapping> = self
            .mappings
            .iter()
            .filter_map(|m| match m {
                Mapping::Endpoint(ep) if ep.path == path && ep.method == Some(method) => Some(m),
                _ => None,
            })
            .flat_map(leaf_mappings)
            .collect();

        let any: Vec<&Mapping> = self
            .mappings
            .iter()
            .filter_map(|m| match m {
                Mapping::Endpoint(ep) if ep.path == path && ep.method.is_none() => Some(m),
                _ => None,
            })
            .flat_map(leaf_mappings)
            .collect();

        vec![exact, any]
    }

    fn global_scope(&self) -> Vec<&Mapping> {
        self.mappings
            .iter()
            .filter(|m| !matches!(m, Mapping::Endpoint(_)))
            .collect()
    }
}

fn single<'a, T>(
    matches: Vec<&'a T>,
    schema: &dyn MappingSchema,
) -> Result<Option<&'a T>, ConvertError>
where
    T: MappingTarget,
{
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0])),
        _ => Err(ConvertError::AmbiguousTypeMapping {
            name: schema.name().to_string(),
            targets: matches.iter().map(|m| m.target_name()).collect(),
        }),
    }
}

/// Gives ambiguity errors a printable target per conflicting rule.
trait MappingTarget {
    fn target_name(&self) -> String;
}

impl MappingTarget for TypeMapping {
    fn target_name(&self) -> String {
        self.target_type_name.clone()
    }
}

impl MappingTarget for ResultTypeMapping {
    fn target_name(&self) -> String {
        self.target_type_name.clone()
    }
}

impl MappingTarget for AnnotationTypeMapping {
    fn target_name(&self) -> String {
        self.annotation.type_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::rules::{
        EndpointTypeMapping, ParameterTypeMapping, ResponseTypeMapping,
    };

    struct TestSchema {
        path: String,
        method: HttpMethod,
        name: String,
        content_type: Option<String>,
        schema_type: Option<String>,
        format: Option<String>,
    }

    impl TestSchema {
        fn named(name: &str) -> Self {
            Self {
                path: "/foo".into(),
                method: HttpMethod::Get,
                name: name.into(),
                content_type: None,
                schema_type: Some("object".into()),
                format: None,
            }
        }

        fn primitive(name: &str, schema_type: &str, format: Option<&str>) -> Self {
            Self {
                path: "/foo".into(),
                method: HttpMethod::Get,
                name: name.into(),
                content_type: None,
                schema_type: Some(schema_type.into()),
                format: format.map(str::to_string),
            }
        }
    }

    impl MappingSchema for TestSchema {
        fn path(&self) -> &str {
            &self.path
        }

        fn method(&self) -> HttpMethod {
            self.method
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn content_type(&self) -> Option<&str> {
            self.content_type.as_deref()
        }

        fn schema_type(&self) -> Option<&str> {
            self.schema_type.as_deref()
        }

        fn format(&self) -> Option<&str> {
            self.format.as_deref()
        }

        fn is_primitive(&self) -> bool {
            matches!(
                self.schema_type.as_deref(),
                Some("boolean" | "integer" | "number" | "string")
            )
        }

        fn is_array(&self) -> bool {
            self.schema_type.as_deref() == Some("array")
        }
    }

    fn endpoint(path: &str, method: Option<HttpMethod>, mappings: Vec<Mapping>) -> Mapping {
        Mapping::Endpoint(EndpointTypeMapping {
            path: path.into(),
            method,
            mappings,
            exclude: false,
        })
    }

    #[test]
    fn global_type_mapping_matches_by_name() {
        let finder = MappingFinder::new(vec![Mapping::Type(TypeMapping::new(
            "Foo",
            "io.pkg.Foo",
        ))]);

        let found = finder.find_type_mapping(&TestSchema::named("Foo")).unwrap();
        assert_eq!(found.unwrap().target_type_name, "io.pkg.Foo");

        let none = finder.find_type_mapping(&TestSchema::named("Bar")).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn endpoint_mapping_wins_over_global() {
        let finder = MappingFinder::new(vec![
            Mapping::Type(TypeMapping::new("Foo", "io.pkg.Global")),
            endpoint(
                "/foo",
                None,
                vec![Mapping::Type(TypeMapping::new("Foo", "io.pkg.Endpoint"))],
            ),
        ]);

        let found = finder
            .find_type_mapping(&TestSchema::named("Foo"))
            .unwrap()
            .unwrap();
        assert_eq!(found.target_type_name, "io.pkg.Endpoint");
    }

    #[test]
    fn exact_method_endpoint_wins_over_method_less() {
        let finder = MappingFinder::new(vec![
            endpoint(
                "/foo",
                None,
                vec![Mapping::Type(TypeMapping::new("Foo", "io.pkg.AnyMethod"))],
            ),
            endpoint(
                "/foo",
                Some(HttpMethod::Get),
                vec![Mapping::Type(TypeMapping::new("Foo", "io.pkg.GetOnly"))],
            ),
        ]);

        let found = finder
            .find_type_mapping(&TestSchema::named("Foo"))
            .unwrap()
            .unwrap();
        assert_eq!(found.target_type_name, "io.pkg.GetOnly");

        let mut other = TestSchema::named("Foo");
        other.method = HttpMethod::Post;
        let found = finder.find_type_mapping(&other).unwrap().unwrap();
        assert_eq!(found.target_type_name, "io.pkg.AnyMethod");
    }

    #[test]
    fn parameter_mapping_wins_over_type_mapping() {
        let finder = MappingFinder::new(vec![
            Mapping::Type(TypeMapping::new("Foo", "io.pkg.ByType")),
            Mapping::Parameter(ParameterTypeMapping {
                parameter_name: "Foo".into(),
                mapping: TypeMapping::new("Foo", "io.pkg.ByParameter"),
            }),
        ]);

        let found = finder
            .find_type_mapping(&TestSchema::named("Foo"))
            .unwrap()
            .unwrap();
        assert_eq!(found.target_type_name, "io.pkg.ByParameter");
    }

    #[test]
    fn response_mapping_matches_content_type() {
        let finder = MappingFinder::new(vec![Mapping::Response(ResponseTypeMapping {
            content_type: "application/vnd.custom".into(),
            mapping: TypeMapping::new("Foo", "io.pkg.Custom"),
        })]);

        let mut schema = TestSchema::named("Foo");
        schema.content_type = Some("application/vnd.custom".into());
        let found = finder.find_type_mapping(&schema).unwrap().unwrap();
        assert_eq!(found.target_type_name, "io.pkg.Custom");

        schema.content_type = Some("application/json".into());
        assert!(finder.find_type_mapping(&schema).unwrap().is_none());
    }

    #[test]
    fn format_disambiguates_type_mappings() {
        let finder = MappingFinder::new(vec![
            Mapping::Type(TypeMapping::new("string", "java.lang.String")),
            Mapping::Type(TypeMapping::new("string", "java.time.Instant").with_format("date-time")),
        ]);

        let plain = TestSchema::primitive("prop", "string", None);
        let found = finder.find_type_mapping(&plain).unwrap().unwrap();
        assert_eq!(found.target_type_name, "java.lang.String");

        let stamped = TestSchema::primitive("prop", "string", Some("date-time"));
        let found = finder.find_type_mapping(&stamped).unwrap().unwrap();
        assert_eq!(found.target_type_name, "java.time.Instant");
    }

    #[test]
    fn array_mapping_ignores_format() {
        let finder = MappingFinder::new(vec![Mapping::Type(TypeMapping::new(
            "array",
            "java.util.List",
        ))]);

        let mut schema = TestSchema::named("foos");
        schema.schema_type = Some("array".into());
        schema.format = Some("whatever".into());
        let found = finder.find_type_mapping(&schema).unwrap().unwrap();
        assert_eq!(found.target_type_name, "java.util.List");
    }

    #[test]
    fn duplicate_rules_are_ambiguous() {
        let finder = MappingFinder::new(vec![
            Mapping::Type(TypeMapping::new("Foo", "io.pkg.A")),
            Mapping::Type(TypeMapping::new("Foo", "io.pkg.B")),
        ]);

        let err = finder
            .find_type_mapping(&TestSchema::named("Foo"))
            .unwrap_err();
        match err {
            ConvertError::AmbiguousTypeMapping { name, targets } => {
                assert_eq!(name, "Foo");
                assert_eq!(targets, vec!["io.pkg.A", "io.pkg.B"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_wrapper_is_endpoint_only() {
        let finder = MappingFinder::new(vec![
            Mapping::NullWrapper(NullTypeMapping {
                target_type_name: "org.openapitools.jackson.nullable.JsonNullable".into(),
                undefined: None,
            }),
            endpoint(
                "/foo",
                None,
                vec![Mapping::NullWrapper(NullTypeMapping {
                    target_type_name: "io.pkg.Nullable".into(),
                    undefined: Some("JsonNullable.undefined()".into()),
                })],
            ),
        ]);

        let found = finder
            .find_endpoint_null_type_mapping(&TestSchema::named("Foo"))
            .unwrap();
        assert_eq!(found.target_type_name, "io.pkg.Nullable");

        let mut elsewhere = TestSchema::named("Foo");
        elsewhere.path = "/bar".into();
        assert!(finder.find_endpoint_null_type_mapping(&elsewhere).is_none());
    }

    #[test]
    fn single_and_multi_wrappers_resolve_by_scope() {
        let finder = MappingFinder::new(vec![
            Mapping::Type(TypeMapping::new("single", "reactor.core.publisher.Mono")),
            endpoint(
                "/foo",
                None,
                vec![Mapping::Type(TypeMapping::new("multi", "reactor.core.publisher.Flux"))],
            ),
        ]);

        let schema = TestSchema::named("Foo");
        let single = finder.find_single_type_mapping(&schema).unwrap().unwrap();
        assert_eq!(single.target_type_name, "reactor.core.publisher.Mono");

        let multi = finder.find_multi_type_mapping(&schema).unwrap().unwrap();
        assert_eq!(multi.target_type_name, "reactor.core.publisher.Flux");

        let mut elsewhere = TestSchema::named("Foo");
        elsewhere.path = "/bar".into();
        assert!(finder.find_multi_type_mapping(&elsewhere).unwrap().is_none());
    }

    #[test]
    fn excluded_endpoint_matches_path_and_method() {
        let finder = MappingFinder::new(vec![Mapping::Endpoint(EndpointTypeMapping {
            path: "/foo".into(),
            method: Some(HttpMethod::Post),
            mappings: Vec::new(),
            exclude: true,
        })]);

        assert!(finder.is_excluded_endpoint("/foo", HttpMethod::Post));
        assert!(!finder.is_excluded_endpoint("/foo", HttpMethod::Get));
        assert!(!finder.is_excluded_endpoint("/bar", HttpMethod::Post));
    }

    #[test]
    fn result_style_defaults_to_success() {
        let finder = MappingFinder::new(Vec::new());
        assert_eq!(finder.find_result_style(), ResultStyle::Success);

        let finder = MappingFinder::new(vec![Mapping::ResultStyle(ResultStyle::All)]);
        assert_eq!(finder.find_result_style(), ResultStyle::All);
    }
}
