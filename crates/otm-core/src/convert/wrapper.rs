//! Wrapping of converted payload types: `single:` for non-collection
//! payloads, `multi:` for collections, `result:` for the response envelope
//! and `null:` for nullable object properties.
//!
//! A wrapper rule with the target `plain` is an explicit no-op. It behaves
//! like a missing rule but shadows rules of broader scopes.

use crate::error::ConvertError;
use crate::mapping::MappingFinder;
use crate::model::datatypes::{
    DataType, MappedCollectionDataType, NullDataType, ResultDataType, SingleDataType,
};

use super::schema_info::SchemaInfo;

const PLAIN: &str = "plain";

/// Wraps non-collection payloads in the configured single wrapper type,
/// e.g. `Mono<Foo>`.
pub struct SingleDataTypeWrapper<'f> {
    finder: &'f MappingFinder,
}

impl<'f> SingleDataTypeWrapper<'f> {
    pub fn new(finder: &'f MappingFinder) -> Self {
        Self { finder }
    }

    pub fn wrap(&self, info: &SchemaInfo, data_type: DataType) -> Result<DataType, ConvertError> {
        let Some(mapping) = self.finder.find_single_type_mapping(info)? else {
            return Ok(data_type);
        };
        let target = mapping.target_type();
        if target.type_name == PLAIN {
            return Ok(data_type);
        }
        if matches!(
            data_type,
            DataType::Array(_) | DataType::MappedCollection(_)
        ) {
            return Ok(data_type);
        }

        Ok(DataType::Single(SingleDataType {
            name: target.name().to_string(),
            pkg: target.pkg().to_string(),
            item: Box::new(check_none(data_type)),
        }))
    }
}

/// Replaces collection payloads with the configured multi wrapper type,
/// e.g. `Flux<Foo>` instead of `Foo[]`.
pub struct MultiDataTypeWrapper<'f> {
    finder: &'f MappingFinder,
}

impl<'f> MultiDataTypeWrapper<'f> {
    pub fn new(finder: &'f MappingFinder) -> Self {
        Self { finder }
    }

    pub fn wrap(&self, info: &SchemaInfo, data_type: DataType) -> Result<DataType, ConvertError> {
        let Some(mapping) = self.finder.find_multi_type_mapping(info)? else {
            return Ok(data_type);
        };
        let target = mapping.target_type();
        if target.type_name == PLAIN {
            return Ok(data_type);
        }

        let item = match data_type {
            DataType::Array(array) => array.item,
            DataType::MappedCollection(collection) => collection.item,
            other => return Ok(other),
        };

        Ok(DataType::MappedCollection(MappedCollectionDataType {
            name: target.name().to_string(),
            pkg: target.pkg().to_string(),
            item,
        }))
    }
}

/// Wraps response payloads in the configured result envelope, e.g.
/// `ResponseEntity<Foo>`.
pub struct ResultDataTypeWrapper<'f> {
    finder: &'f MappingFinder,
}

impl<'f> ResultDataTypeWrapper<'f> {
    pub fn new(finder: &'f MappingFinder) -> Self {
        Self { finder }
    }

    pub fn wrap(&self, info: &SchemaInfo, data_type: DataType) -> Result<DataType, ConvertError> {
        let Some(mapping) = self.finder.find_result_type_mapping(info)? else {
            return Ok(data_type);
        };
        let target = mapping.target_type();
        if target.type_name == PLAIN {
            return Ok(data_type);
        }

        Ok(DataType::Result(ResultDataType {
            name: target.name().to_string(),
            pkg: target.pkg().to_string(),
            item: Box::new(check_none(data_type)),
        }))
    }
}

/// Wraps nullable object properties in the endpoint's null wrapper type,
/// e.g. `JsonNullable<Foo>`.
pub struct NullDataTypeWrapper<'f> {
    finder: &'f MappingFinder,
}

impl<'f> NullDataTypeWrapper<'f> {
    pub fn new(finder: &'f MappingFinder) -> Self {
        Self { finder }
    }

    pub fn wrap(&self, info: &SchemaInfo, data_type: DataType) -> DataType {
        let Some(mapping) = self.finder.find_endpoint_null_type_mapping(info) else {
            return data_type;
        };
        let target = mapping.target_type();
        if target.type_name == PLAIN {
            return data_type;
        }

        DataType::Null(NullDataType {
            name: target.name().to_string(),
            pkg: target.pkg().to_string(),
            item: Box::new(data_type),
            undefined: mapping.undefined,
        })
    }
}

/// An empty payload wrapped by single or result keeps a typed absence.
fn check_none(data_type: DataType) -> DataType {
    match data_type {
        DataType::None(none) => DataType::None(none.wrapped_in_result()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::rules::{
        EndpointTypeMapping, Mapping, NullTypeMapping, ResultTypeMapping, TypeMapping,
    };
    use crate::model::datatypes::{
        ArrayDataType, DataTypeConstraints, NoneDataType, PrimitiveDataType, PrimitiveKind,
    };
    use crate::parse::ref_resolve::RefResolver;
    use crate::parse::spec::OpenApi;
    use crate::parse::HttpMethod;

    fn empty_spec() -> OpenApi {
        crate::parse::from_yaml(
            "openapi: 3.0.3\ninfo:\n  title: t\n  version: '1'\npaths: {}\n",
        )
        .unwrap()
    }

    fn string_type() -> DataType {
        DataType::Primitive(PrimitiveDataType {
            kind: PrimitiveKind::String,
            constraints: DataTypeConstraints::default(),
            deprecated: false,
        })
    }

    fn string_array() -> DataType {
        DataType::Array(ArrayDataType {
            item: Box::new(string_type()),
            constraints: DataTypeConstraints::default(),
            deprecated: false,
        })
    }

    #[test]
    fn single_wraps_non_collection_payloads_only() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let info = SchemaInfo::new("/foo", HttpMethod::Get, "Foo", None, None, &resolver);
        let finder = MappingFinder::new(vec![Mapping::Type(TypeMapping::new(
            "single",
            "reactor.core.publisher.Mono",
        ))]);
        let wrapper = SingleDataTypeWrapper::new(&finder);

        let wrapped = wrapper.wrap(&info, string_type()).unwrap();
        assert_eq!(wrapped.type_name(), "Mono<String>");

        let untouched = wrapper.wrap(&info, string_array()).unwrap();
        assert_eq!(untouched.type_name(), "String[]");
    }

    #[test]
    fn single_marks_empty_payloads() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let info = SchemaInfo::new("/foo", HttpMethod::Get, "Foo", None, None, &resolver);
        let finder = MappingFinder::new(vec![Mapping::Type(TypeMapping::new(
            "single",
            "reactor.core.publisher.Mono",
        ))]);
        let wrapper = SingleDataTypeWrapper::new(&finder);

        let wrapped = wrapper
            .wrap(&info, DataType::None(NoneDataType::default()))
            .unwrap();
        assert_eq!(wrapped.type_name(), "Mono<Void>");
        match wrapped {
            DataType::Single(single) => match *single.item {
                DataType::None(none) => assert!(none.wrapped_in_result),
                other => panic!("unexpected item: {other:?}"),
            },
            other => panic!("unexpected type: {other:?}"),
        }
    }

    #[test]
    fn multi_replaces_the_array_with_the_wrapper() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let info = SchemaInfo::new("/foo", HttpMethod::Get, "Foo", None, None, &resolver);
        let finder = MappingFinder::new(vec![Mapping::Type(TypeMapping::new(
            "multi",
            "reactor.core.publisher.Flux",
        ))]);
        let wrapper = MultiDataTypeWrapper::new(&finder);

        let wrapped = wrapper.wrap(&info, string_array()).unwrap();
        assert_eq!(wrapped.type_name(), "Flux<String>");

        let untouched = wrapper.wrap(&info, string_type()).unwrap();
        assert_eq!(untouched.type_name(), "String");
    }

    #[test]
    fn result_wraps_and_marks_empty_payloads() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let info = SchemaInfo::new("/foo", HttpMethod::Get, "Foo", None, None, &resolver);
        let finder = MappingFinder::new(vec![Mapping::ResultWrapper(ResultTypeMapping {
            target_type_name: "org.springframework.http.ResponseEntity".into(),
        })]);
        let wrapper = ResultDataTypeWrapper::new(&finder);

        let wrapped = wrapper
            .wrap(&info, DataType::None(NoneDataType::default()))
            .unwrap();
        assert_eq!(wrapped.type_name(), "ResponseEntity<Void>");
        match wrapped {
            DataType::Result(result) => match *result.item {
                DataType::None(none) => assert!(none.wrapped_in_result),
                other => panic!("unexpected item: {other:?}"),
            },
            other => panic!("unexpected type: {other:?}"),
        }
    }

    #[test]
    fn plain_wrapper_shadows_a_global_rule() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let info = SchemaInfo::new("/foo", HttpMethod::Get, "Foo", None, None, &resolver);
        let finder = MappingFinder::new(vec![
            Mapping::Type(TypeMapping::new("single", "reactor.core.publisher.Mono")),
            Mapping::Endpoint(EndpointTypeMapping {
                path: "/foo".into(),
                method: None,
                mappings: vec![Mapping::Type(TypeMapping::new("single", "plain"))],
                exclude: false,
            }),
        ]);
        let wrapper = SingleDataTypeWrapper::new(&finder);

        let untouched = wrapper.wrap(&info, string_type()).unwrap();
        assert_eq!(untouched.type_name(), "String");
    }

    #[test]
    fn null_wrapper_keeps_undefined_initializer() {
        let spec = empty_spec();
        let resolver = RefResolver::new(&spec);
        let info = SchemaInfo::new("/foo", HttpMethod::Get, "Foo", None, None, &resolver);
        let finder = MappingFinder::new(vec![Mapping::Endpoint(EndpointTypeMapping {
            path: "/foo".into(),
            method: None,
            mappings: vec![Mapping::NullWrapper(NullTypeMapping {
                target_type_name: "org.openapitools.jackson.nullable.JsonNullable".into(),
                undefined: Some("JsonNullable.undefined()".into()),
            })],
            exclude: false,
        })]);
        let wrapper = NullDataTypeWrapper::new(&finder);

        let wrapped = wrapper.wrap(&info, string_type());
        match wrapped {
            DataType::Null(null) => {
                assert_eq!(null.name, "JsonNullable");
                assert_eq!(null.undefined.as_deref(), Some("JsonNullable.undefined()"));
            }
            other => panic!("unexpected type: {other:?}"),
        }
    }
}
