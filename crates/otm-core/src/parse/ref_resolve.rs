use crate::error::ParseError;

use super::schema::Schema;
use super::spec::OpenApi;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// The target of a resolved `$ref`. `name` is `None` for anonymous targets.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSchema<'a> {
    pub name: Option<&'a str>,
    pub schema: &'a Schema,
}

/// Resolves `#/components/schemas/{name}` references against a document.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    spec: &'a OpenApi,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApi) -> Self {
        Self { spec }
    }

    /// Resolve a single `$ref` to its target schema and declared name. A
    /// chain of refs is not followed here; the converter recurses on the
    /// returned schema and resolves the next link itself.
    pub fn resolve(&self, ref_path: &'a str) -> Result<ResolvedSchema<'a>, ParseError> {
        let name = ref_path
            .strip_prefix(SCHEMA_REF_PREFIX)
            .ok_or_else(|| ParseError::InvalidRefFormat(ref_path.to_string()))?;

        let schema = self
            .spec
            .components
            .as_ref()
            .and_then(|c| c.schemas.get(name))
            .ok_or_else(|| ParseError::RefTargetNotFound(ref_path.to_string()))?;

        Ok(ResolvedSchema {
            name: Some(name),
            schema,
        })
    }
}
