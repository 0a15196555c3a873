//! The converted API: interfaces grouped by tag, their endpoints and the
//! registry of the model types they use.

use indexmap::IndexMap;

use crate::mapping::rules::{MappingAnnotation, ResultStyle};
use crate::parse::HttpMethod;

use super::datatypes::DataType;
use super::registry::DataTypes;

#[derive(Debug)]
pub struct Api {
    pub interfaces: Vec<Interface>,
    pub data_types: DataTypes,
    pub result_style: ResultStyle,
}

/// One generated interface, grouping the endpoints of a tag.
#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub pkg: String,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub parameters: Vec<Parameter>,
    pub request_bodies: Vec<RequestBody>,
    /// responses keyed by status, a status may have several content types
    pub responses: IndexMap<String, Vec<Response>>,
    pub endpoint_responses: Vec<EndpointResponse>,
}

impl Endpoint {
    /// Group the raw responses into one [`EndpointResponse`] per success
    /// response, each carrying the shared error responses.
    pub fn init_endpoint_responses(&mut self) {
        let mut successes = Vec::new();
        let mut errors = Vec::new();

        for (status, responses) in &self.responses {
            if status.starts_with('2') {
                successes.extend(responses.iter().cloned());
            } else {
                errors.extend(responses.iter().cloned());
            }
        }

        self.endpoint_responses = successes
            .into_iter()
            .map(|main| EndpointResponse {
                main,
                errors: errors.clone(),
            })
            .collect();
    }
}

/// A success response paired with the endpoint's error responses.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    pub main: Response,
    pub errors: Vec<Response>,
}

impl EndpointResponse {
    /// The endpoint's declared response type. Where there is no single
    /// common type it widens to `Object`.
    pub fn response_type_name(&self, style: ResultStyle) -> String {
        if self.multiple_responses(style) {
            return "Object".to_string();
        }
        self.main.response_type.type_name()
    }

    /// A `oneOf`/`anyOf` payload has no single declared type, it always
    /// counts as a multi response. Error responses count with `all` style.
    fn multiple_responses(&self, style: ResultStyle) -> bool {
        if matches!(
            self.main.response_type,
            DataType::Composed(_) | DataType::Interface(_)
        ) {
            return true;
        }
        style == ResultStyle::All && !self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    /// empty for a body-less response
    pub content_type: String,
    pub response_type: DataType,
    pub description: Option<String>,
}

impl Response {
    pub fn empty(&self) -> bool {
        self.content_type.is_empty()
    }
}

#[derive(Debug)]
pub struct RequestBody {
    pub content_type: String,
    pub data_type: DataType,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    Query,
    Path,
    Header,
    Cookie,
    /// added by an `add:` mapping rule, not present in the API description
    Additional,
    /// exploded property of a multipart request body
    Multipart { content_type: String },
}

#[derive(Debug)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub required: bool,
    pub deprecated: bool,
    pub data_type: DataType,
    pub annotation: Option<MappingAnnotation>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::datatypes::NoneDataType;

    fn response(content_type: &str) -> Response {
        Response {
            content_type: content_type.to_string(),
            response_type: DataType::None(NoneDataType::default()),
            description: None,
        }
    }

    fn endpoint(responses: IndexMap<String, Vec<Response>>) -> Endpoint {
        Endpoint {
            path: "/foo".into(),
            method: HttpMethod::Get,
            operation_id: None,
            summary: None,
            description: None,
            deprecated: false,
            parameters: Vec::new(),
            request_bodies: Vec::new(),
            responses,
            endpoint_responses: Vec::new(),
        }
    }

    #[test]
    fn groups_success_and_error_responses() {
        let mut responses = IndexMap::new();
        responses.insert("200".to_string(), vec![response("application/json")]);
        responses.insert("404".to_string(), vec![response("application/problem+json")]);

        let mut ep = endpoint(responses);
        ep.init_endpoint_responses();

        assert_eq!(ep.endpoint_responses.len(), 1);
        let er = &ep.endpoint_responses[0];
        assert_eq!(er.main.content_type, "application/json");
        assert_eq!(er.errors.len(), 1);
    }

    #[test]
    fn response_type_widens_with_errors_in_all_style() {
        let mut responses = IndexMap::new();
        responses.insert("204".to_string(), vec![response("")]);
        responses.insert("500".to_string(), vec![response("application/json")]);

        let mut ep = endpoint(responses);
        ep.init_endpoint_responses();

        let er = &ep.endpoint_responses[0];
        assert_eq!(er.response_type_name(ResultStyle::All), "Object");
        assert_eq!(er.response_type_name(ResultStyle::Success), "Void");
    }

    #[test]
    fn composed_response_always_widens_to_object() {
        use crate::model::datatypes::{
            ComposedDataType, ComposedStyle, DataTypeConstraints, DataTypeName,
        };

        let composed = DataType::Composed(ComposedDataType {
            name: DataTypeName::new("FooOrBar"),
            pkg: "io.pkg.model".into(),
            style: ComposedStyle::OneOf,
            items: Vec::new(),
            constraints: DataTypeConstraints::default(),
            deprecated: false,
        });
        let er = EndpointResponse {
            main: Response {
                content_type: "application/json".into(),
                response_type: composed,
                description: None,
            },
            errors: Vec::new(),
        };

        assert_eq!(er.response_type_name(ResultStyle::Success), "Object");
        assert_eq!(er.response_type_name(ResultStyle::All), "Object");
    }

    #[test]
    fn multiple_success_responses_yield_multiple_groups() {
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            vec![response("application/json"), response("text/plain")],
        );

        let mut ep = endpoint(responses);
        ep.init_endpoint_responses();

        assert_eq!(ep.endpoint_responses.len(), 2);
        assert!(ep.endpoint_responses.iter().all(|er| er.errors.is_empty()));
    }
}
