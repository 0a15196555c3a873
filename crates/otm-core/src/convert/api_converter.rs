//! Builds the [`Api`] model from a parsed description: interfaces grouped
//! by tag, endpoints with their converted parameters, request bodies and
//! responses.
//!
//! Endpoints that fail with a recoverable conversion error are logged and
//! skipped, the remaining endpoints still convert. Ambiguous mappings and
//! broken references abort the whole conversion.

use indexmap::IndexMap;

use crate::config::ApiOptions;
use crate::error::ConvertError;
use crate::mapping::MappingFinder;
use crate::model::api::{
    Api, Endpoint, Interface, Parameter, ParameterKind, RequestBody, Response,
};
use crate::model::datatypes::{DataType, NoneDataType};
use crate::model::registry::DataTypes;
use crate::parse::operation::Operation;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::OpenApi;
use crate::parse::HttpMethod;

use super::converter::DataTypeConverter;
use super::name::{capitalize_first, to_class};
use super::schema_info::SchemaInfo;
use super::wrapper::{MultiDataTypeWrapper, ResultDataTypeWrapper, SingleDataTypeWrapper};

pub struct ApiConverter<'a> {
    options: &'a ApiOptions,
    finder: MappingFinder,
}

impl<'a> ApiConverter<'a> {
    pub fn new(options: &'a ApiOptions) -> Self {
        Self {
            options,
            finder: MappingFinder::new(options.type_mappings.clone()),
        }
    }

    pub fn convert(&self, spec: &OpenApi) -> Result<Api, ConvertError> {
        let resolver = RefResolver::new(spec);
        let mut data_types = DataTypes::new();
        let mut converter = DataTypeConverter::new(self.options, &self.finder);
        let mut interfaces: IndexMap<String, Interface> = IndexMap::new();

        for (path, path_item) in &spec.paths {
            for (method, operation) in path_item.operations() {
                let name = self.interface_name(path, method, operation);

                let endpoint = match self.create_endpoint(
                    path,
                    method,
                    operation,
                    &resolver,
                    &mut converter,
                    &mut data_types,
                ) {
                    Ok(endpoint) => endpoint,
                    Err(err) if err.is_endpoint_recoverable() => {
                        log::error!(
                            "skipping endpoint {} {path}: {err}",
                            method.as_str().to_uppercase()
                        );
                        continue;
                    }
                    Err(err) => return Err(err),
                };

                interfaces
                    .entry(name.clone())
                    .or_insert_with(|| Interface {
                        name,
                        pkg: self.options.api_pkg(),
                        endpoints: Vec::new(),
                    })
                    .endpoints
                    .push(endpoint);
            }
        }

        Ok(Api {
            interfaces: interfaces.into_values().collect(),
            data_types,
            result_style: self.finder.find_result_style(),
        })
    }

    fn interface_name(&self, path: &str, method: HttpMethod, operation: &Operation) -> String {
        let base = match operation.first_tag() {
            Some(tag) => to_class(tag),
            None => "Api".to_string(),
        };
        if self.finder.is_excluded_endpoint(path, method) {
            format!("{base}Excluded")
        } else {
            base
        }
    }

    fn create_endpoint(
        &self,
        path: &str,
        method: HttpMethod,
        operation: &Operation,
        resolver: &RefResolver,
        converter: &mut DataTypeConverter,
        data_types: &mut DataTypes,
    ) -> Result<Endpoint, ConvertError> {
        let mut endpoint = Endpoint {
            path: path.to_string(),
            method,
            operation_id: operation.operation_id.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            deprecated: operation.deprecated,
            parameters: Vec::new(),
            request_bodies: Vec::new(),
            responses: IndexMap::new(),
            endpoint_responses: Vec::new(),
        };

        self.create_parameters(&mut endpoint, operation, resolver, converter, data_types)?;
        self.create_request_bodies(&mut endpoint, operation, resolver, converter, data_types)?;
        self.create_responses(&mut endpoint, operation, resolver, converter, data_types)?;

        endpoint.init_endpoint_responses();
        Ok(endpoint)
    }

    fn create_parameters(
        &self,
        endpoint: &mut Endpoint,
        operation: &Operation,
        resolver: &RefResolver,
        converter: &mut DataTypeConverter,
        data_types: &mut DataTypes,
    ) -> Result<(), ConvertError> {
        for parameter in &operation.parameters {
            let kind = match parameter.location.as_str() {
                "query" => ParameterKind::Query,
                "path" => ParameterKind::Path,
                "header" => ParameterKind::Header,
                "cookie" => ParameterKind::Cookie,
                other => {
                    return Err(ConvertError::UnknownParameterLocation {
                        name: parameter.name.clone(),
                        location: other.to_string(),
                    })
                }
            };

            let info = SchemaInfo::new(
                endpoint.path.as_str(),
                endpoint.method,
                parameter.name.as_str(),
                None,
                parameter.schema.as_ref(),
                resolver,
            );
            let data_type = converter.convert(&info, data_types)?;
            let annotation = self
                .finder
                .find_annotation_type_mapping(&info)?
                .map(|m| m.annotation);

            endpoint.parameters.push(Parameter {
                name: parameter.name.clone(),
                kind,
                required: parameter.required,
                deprecated: parameter.deprecated,
                data_type,
                annotation,
                description: parameter.description.clone(),
            });
        }

        // parameters added by mapping rules, they have no schema
        for added in self
            .finder
            .find_add_parameter_type_mappings(&endpoint.path, endpoint.method)
        {
            endpoint.parameters.push(Parameter {
                name: added.parameter_name.clone(),
                kind: ParameterKind::Additional,
                required: false,
                deprecated: false,
                data_type: converter.create_mapped(&added.mapping, false),
                annotation: added.annotation,
                description: None,
            });
        }

        Ok(())
    }

    fn create_request_bodies(
        &self,
        endpoint: &mut Endpoint,
        operation: &Operation,
        resolver: &RefResolver,
        converter: &mut DataTypeConverter,
        data_types: &mut DataTypes,
    ) -> Result<(), ConvertError> {
        let Some(request_body) = &operation.request_body else {
            return Ok(());
        };

        for (content_type, media_type) in &request_body.content {
            if content_type.starts_with("multipart/") {
                self.create_multipart_parameters(
                    endpoint,
                    content_type,
                    media_type.schema.as_ref(),
                    resolver,
                    converter,
                    data_types,
                )?;
                continue;
            }

            let name = format!(
                "{}{}RequestBody",
                to_class(&endpoint.path),
                capitalize_first(endpoint.method.as_str())
            );
            let info = SchemaInfo::new(
                endpoint.path.as_str(),
                endpoint.method,
                name,
                Some(content_type.clone()),
                media_type.schema.as_ref(),
                resolver,
            );

            let data_type = converter.convert(&info, data_types)?;
            let data_type = MultiDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;
            let data_type = SingleDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;

            endpoint.request_bodies.push(RequestBody {
                content_type: content_type.clone(),
                data_type,
                required: request_body.required,
                description: request_body.description.clone(),
            });
        }

        Ok(())
    }

    /// A multipart body explodes into one parameter per object property.
    /// The intermediate object type is dropped again, it is not part of the
    /// generated model.
    fn create_multipart_parameters(
        &self,
        endpoint: &mut Endpoint,
        content_type: &str,
        schema: Option<&crate::parse::schema::Schema>,
        resolver: &RefResolver,
        converter: &mut DataTypeConverter,
        data_types: &mut DataTypes,
    ) -> Result<(), ConvertError> {
        let name = format!(
            "{}{}RequestBody",
            to_class(&endpoint.path),
            capitalize_first(endpoint.method.as_str())
        );
        let info = SchemaInfo::new(
            endpoint.path.as_str(),
            endpoint.method,
            name,
            Some(content_type.to_string()),
            schema,
            resolver,
        );

        let data_type = converter.convert(&info, data_types)?;
        let DataType::Object(object) = data_type else {
            return Err(ConvertError::MultipartBodyNotObject {
                path: endpoint.path.clone(),
            });
        };

        for (prop_name, prop_type) in &object.properties {
            endpoint.parameters.push(Parameter {
                name: prop_name.clone(),
                kind: ParameterKind::Multipart {
                    content_type: content_type.to_string(),
                },
                required: object.constraints.is_required(prop_name),
                deprecated: false,
                data_type: prop_type.clone(),
                annotation: None,
                description: None,
            });
        }

        data_types.del(&object.name.id);
        Ok(())
    }

    fn create_responses(
        &self,
        endpoint: &mut Endpoint,
        operation: &Operation,
        resolver: &RefResolver,
        converter: &mut DataTypeConverter,
        data_types: &mut DataTypes,
    ) -> Result<(), ConvertError> {
        for (status, response) in &operation.responses {
            let mut converted = Vec::new();

            if response.content.is_empty() {
                let info = SchemaInfo::new(
                    endpoint.path.as_str(),
                    endpoint.method,
                    "",
                    None,
                    None,
                    resolver,
                );
                let data_type = DataType::None(NoneDataType::default());
                let data_type = SingleDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;
                let data_type = ResultDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;
                converted.push(Response {
                    content_type: String::new(),
                    response_type: data_type,
                    description: response.description.clone(),
                });
            }

            for (content_type, media_type) in &response.content {
                let name = format!(
                    "{}{}Response{status}",
                    to_class(&endpoint.path),
                    capitalize_first(endpoint.method.as_str())
                );
                let info = SchemaInfo::new(
                    endpoint.path.as_str(),
                    endpoint.method,
                    name,
                    Some(content_type.clone()),
                    media_type.schema.as_ref(),
                    resolver,
                );

                let data_type = converter.convert(&info, data_types)?;
                let data_type = MultiDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;
                let data_type = SingleDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;
                let data_type = ResultDataTypeWrapper::new(&self.finder).wrap(&info, data_type)?;

                converted.push(Response {
                    content_type: content_type.clone(),
                    response_type: data_type,
                    description: response.description.clone(),
                });
            }

            endpoint.responses.insert(status.clone(), converted);
        }

        Ok(())
    }
}
