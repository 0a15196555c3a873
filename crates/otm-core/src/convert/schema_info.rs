//! A cursor into the API description: one schema plus the endpoint context
//! and the derived name a generated type would get. Child cursors derive
//! their names from the parent, so inline schemas get stable names.

use crate::error::ParseError;
use crate::mapping::MappingSchema;
use crate::parse::schema::{ComposedKind, Schema};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::HttpMethod;

use super::name::capitalize_first;

#[derive(Clone)]
pub struct SchemaInfo<'a> {
    pub path: String,
    pub method: HttpMethod,
    pub name: String,
    pub content_type: Option<String>,
    pub schema: Option<&'a Schema>,
    pub resolver: &'a RefResolver<'a>,
    /// true once a `$ref` was followed; later links of a ref chain keep the
    /// first resolved name, so the public name of the schema survives.
    ref_name: bool,
}

impl<'a> SchemaInfo<'a> {
    pub fn new(
        path: impl Into<String>,
        method: HttpMethod,
        name: impl Into<String>,
        content_type: Option<String>,
        schema: Option<&'a Schema>,
        resolver: &'a RefResolver<'a>,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            name: name.into(),
            content_type,
            schema,
            resolver,
            ref_name: false,
        }
    }

    fn child(&self, name: String, schema: Option<&'a Schema>) -> SchemaInfo<'a> {
        SchemaInfo {
            path: self.path.clone(),
            method: self.method,
            name,
            content_type: self.content_type.clone(),
            schema,
            resolver: self.resolver,
            ref_name: false,
        }
    }

    /// Follow the `$ref` of this schema. The cursor takes the name of the
    /// referenced component; once a ref was followed the name sticks for the
    /// rest of the chain.
    pub fn for_ref(&self) -> Result<SchemaInfo<'a>, ParseError> {
        let ref_path = self.ref_path().unwrap_or_default();
        let resolved = self.resolver.resolve(ref_path)?;
        let name = match resolved.name {
            Some(name) if !self.ref_name => name.to_string(),
            _ => self.name.clone(),
        };
        let mut info = self.child(name, Some(resolved.schema));
        info.ref_name = true;
        Ok(info)
    }

    /// The cursor for the item schema of an array.
    pub fn for_item(&self) -> SchemaInfo<'a> {
        let items = self.schema.and_then(|s| s.items.as_deref());
        self.child(format!("Array{}", capitalize_first(&self.name)), items)
    }

    /// Cursors for the properties of an object, inline property schemas are
    /// named after the parent.
    pub fn properties(&self) -> Vec<(String, SchemaInfo<'a>)> {
        let Some(schema) = self.schema else {
            return Vec::new();
        };
        schema
            .properties
            .iter()
            .map(|(prop, prop_schema)| {
                let name = format!("{}{}", self.name, capitalize_first(prop));
                (prop.clone(), self.child(name, Some(prop_schema)))
            })
            .collect()
    }

    /// Cursors for the items of an `allOf`/`oneOf`/`anyOf` composition.
    pub fn composed_items(&self) -> Vec<SchemaInfo<'a>> {
        let Some(schema) = self.schema else {
            return Vec::new();
        };
        let Some(kind) = schema.composed_kind() else {
            return Vec::new();
        };
        let of = match kind {
            ComposedKind::AllOf => "AllOf",
            ComposedKind::OneOf => "OneOf",
            ComposedKind::AnyOf => "AnyOf",
        };
        schema
            .composed_items()
            .iter()
            .enumerate()
            .map(|(index, item)| self.child(format!("{}_{of}_{index}", self.name), Some(item)))
            .collect()
    }

    pub fn is_ref(&self) -> bool {
        self.schema.is_some_and(|s| s.is_ref())
    }

    pub fn ref_path(&self) -> Option<&'a str> {
        self.schema.and_then(|s| s.ref_path.as_deref())
    }

    pub fn is_composed(&self) -> bool {
        self.schema.is_some_and(|s| s.is_composed())
    }

    pub fn composed_kind(&self) -> Option<ComposedKind> {
        self.schema.and_then(|s| s.composed_kind())
    }

    pub fn is_object(&self) -> bool {
        self.schema.is_some_and(|s| s.is_object())
    }

    pub fn is_enum(&self) -> bool {
        self.schema.is_some_and(|s| !s.enum_values.is_empty())
    }

    pub fn is_untyped(&self) -> bool {
        self.schema.is_none_or(|s| s.is_untyped())
    }

    pub fn is_nullable(&self) -> bool {
        self.schema.is_some_and(|s| s.nullable)
    }

    pub fn is_deprecated(&self) -> bool {
        self.schema.is_some_and(|s| s.deprecated)
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.schema
            .is_some_and(|s| s.required.iter().any(|r| r == property))
    }
}

impl MappingSchema for SchemaInfo<'_> {
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
        self.schema.and_then(|s| s.schema_type.as_deref())
    }

    fn format(&self) -> Option<&str> {
        self.schema.and_then(|s| s.format.as_deref())
    }

    fn is_primitive(&self) -> bool {
        self.schema.is_some_and(|s| s.is_primitive())
    }

    fn is_array(&self) -> bool {
        self.schema.is_some_and(|s| s.is_array())
    }
}
