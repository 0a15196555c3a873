//! The resolved type tree produced by conversion. Every node knows its
//! display name and target package, model nodes also carry the source schema
//! name used as their registry key.

use indexmap::IndexMap;

/// The two names of a generated model type: `id` is the schema name and
/// registry key, `type_id` is the generated class name with the configured
/// model name suffix applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeName {
    pub id: String,
    pub type_id: String,
}

impl DataTypeName {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            type_id: id.clone(),
            id,
        }
    }

    pub fn with_suffix(id: impl Into<String>, suffix: &str) -> Self {
        let id = id.into();
        Self {
            type_id: format!("{id}{suffix}"),
            id,
        }
    }
}

/// Validation facts carried over from the source schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTypeConstraints {
    pub default_value: Option<serde_json::Value>,
    pub nullable: bool,
    pub minimum: Option<f64>,
    pub exclusive_minimum: bool,
    pub maximum: Option<f64>,
    pub exclusive_maximum: bool,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub pattern: Option<String>,
    pub required: Vec<String>,
    pub values: Vec<String>,
}

impl DataTypeConstraints {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    String,
    LocalDate,
    OffsetDateTime,
}

impl PrimitiveKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::String => "String",
            PrimitiveKind::LocalDate => "LocalDate",
            PrimitiveKind::OffsetDateTime => "OffsetDateTime",
        }
    }

    pub fn pkg(&self) -> &'static str {
        match self {
            PrimitiveKind::LocalDate | PrimitiveKind::OffsetDateTime => "java.time",
            _ => "java.lang",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveDataType {
    pub kind: PrimitiveKind,
    pub constraints: DataTypeConstraints,
    pub deprecated: bool,
}

/// An `enum` of string values, generated as its own model type.
#[derive(Debug, Clone, PartialEq)]
pub struct StringEnumDataType {
    pub name: DataTypeName,
    pub pkg: String,
    pub values: Vec<String>,
    pub constraints: DataTypeConstraints,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDataType {
    pub item: Box<DataType>,
    pub constraints: DataTypeConstraints,
    pub deprecated: bool,
}

/// An `object` schema, generated as a model class.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDataType {
    pub name: DataTypeName,
    pub pkg: String,
    pub properties: IndexMap<String, DataType>,
    pub constraints: DataTypeConstraints,
    pub deprecated: bool,
    /// true if this object was merged from an `allOf` composition
    pub all_of: bool,
    pub implements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposedStyle {
    OneOf,
    AnyOf,
}

/// A `oneOf`/`anyOf` composition whose items are not all model objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedDataType {
    pub name: DataTypeName,
    pub pkg: String,
    pub style: ComposedStyle,
    pub items: Vec<DataType>,
    pub constraints: DataTypeConstraints,
    pub deprecated: bool,
}

/// A `oneOf` of model objects, generated as a marker interface the items
/// implement. Items are referenced by their registry keys.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDataType {
    pub name: DataTypeName,
    pub pkg: String,
    pub items: Vec<String>,
}

/// A type replaced by a mapping rule. Generic types are fully qualified
/// names, already resolved against the options.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedDataType {
    pub name: String,
    pub pkg: String,
    pub generic_types: Vec<String>,
    pub deprecated: bool,
    pub simple: bool,
}

/// A mapped collection keeping its item type, e.g. an `array` mapped to
/// `java.util.List`.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedCollectionDataType {
    pub name: String,
    pub pkg: String,
    pub item: Box<DataType>,
}

/// An object mapped to a map type, e.g. `java.util.Map`.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedMapDataType {
    pub name: String,
    pub pkg: String,
    pub generic_types: Vec<String>,
}

/// A payload wrapped by a `single:` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleDataType {
    pub name: String,
    pub pkg: String,
    pub item: Box<DataType>,
}

/// A response wrapped by a `result:` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultDataType {
    pub name: String,
    pub pkg: String,
    pub item: Box<DataType>,
}

/// A nullable property wrapped by a `null:` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NullDataType {
    pub name: String,
    pub pkg: String,
    pub item: Box<DataType>,
    pub undefined: Option<String>,
}

/// A forward reference into the registry, created when conversion hits a
/// `$ref` cycle. Resolved by key when the tree is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyDataType {
    pub name: String,
}

/// A schema that is no schema, e.g. a `description`-only branch in an
/// `allOf` overlay. Dropped when composition branches merge.
#[derive(Debug, Clone, PartialEq)]
pub struct UntypedDataType {
    pub name: DataTypeName,
    pub constraints: DataTypeConstraints,
    pub deprecated: bool,
}

/// The absent payload of a body-less response.
#[derive(Debug, Clone, PartialEq)]
pub struct NoneDataType {
    pub type_name: String,
    pub wrapped_in_result: bool,
}

impl Default for NoneDataType {
    fn default() -> Self {
        Self {
            type_name: "Void".to_string(),
            wrapped_in_result: false,
        }
    }
}

impl NoneDataType {
    pub fn wrapped_in_result(mut self) -> Self {
        self.wrapped_in_result = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Primitive(PrimitiveDataType),
    StringEnum(StringEnumDataType),
    Array(ArrayDataType),
    Object(ObjectDataType),
    Composed(ComposedDataType),
    Interface(InterfaceDataType),
    Mapped(MappedDataType),
    MappedCollection(MappedCollectionDataType),
    MappedMap(MappedMapDataType),
    Single(SingleDataType),
    Result(ResultDataType),
    Null(NullDataType),
    Lazy(LazyDataType),
    Untyped(UntypedDataType),
    None(NoneDataType),
}

impl DataType {
    /// The registry key of a named model type, `None` for structural types.
    pub fn name(&self) -> Option<&str> {
        match self {
            DataType::StringEnum(t) => Some(&t.name.id),
            DataType::Object(t) => Some(&t.name.id),
            DataType::Composed(t) => Some(&t.name.id),
            DataType::Interface(t) => Some(&t.name.id),
            DataType::Mapped(t) => Some(&t.name),
            DataType::MappedCollection(t) => Some(&t.name),
            DataType::MappedMap(t) => Some(&t.name),
            DataType::Lazy(t) => Some(&t.name),
            _ => None,
        }
    }

    /// The display name, generics included.
    pub fn type_name(&self) -> String {
        match self {
            DataType::Primitive(t) => t.kind.type_name().to_string(),
            DataType::StringEnum(t) => t.name.type_id.clone(),
            DataType::Array(t) => format!("{}[]", t.item.type_name()),
            DataType::Object(t) => t.name.type_id.clone(),
            DataType::Composed(t) => t.name.type_id.clone(),
            DataType::Interface(t) => t.name.type_id.clone(),
            DataType::Mapped(t) => with_generics(&t.name, &t.generic_types),
            DataType::MappedCollection(t) => format!("{}<{}>", t.name, t.item.type_name()),
            DataType::MappedMap(t) => with_generics(&t.name, &t.generic_types),
            DataType::Single(t) => format!("{}<{}>", t.name, t.item.type_name()),
            DataType::Result(t) => format!("{}<{}>", t.name, t.item.type_name()),
            DataType::Null(t) => format!("{}<{}>", t.name, t.item.type_name()),
            DataType::Lazy(t) => t.name.clone(),
            DataType::Untyped(t) => t.name.type_id.clone(),
            DataType::None(t) => t.type_name.clone(),
        }
    }

    /// The target package of the type, empty where there is none.
    pub fn pkg(&self) -> &str {
        match self {
            DataType::Primitive(t) => t.kind.pkg(),
            DataType::StringEnum(t) => &t.pkg,
            DataType::Array(t) => t.item.pkg(),
            DataType::Object(t) => &t.pkg,
            DataType::Composed(t) => &t.pkg,
            DataType::Interface(t) => &t.pkg,
            DataType::Mapped(t) => &t.pkg,
            DataType::MappedCollection(t) => &t.pkg,
            DataType::MappedMap(t) => &t.pkg,
            DataType::Single(t) => &t.pkg,
            DataType::Result(t) => &t.pkg,
            DataType::Null(t) => &t.pkg,
            DataType::Lazy(_) => "",
            DataType::Untyped(_) => "",
            DataType::None(_) => "",
        }
    }

    pub fn deprecated(&self) -> bool {
        match self {
            DataType::Primitive(t) => t.deprecated,
            DataType::StringEnum(t) => t.deprecated,
            DataType::Array(t) => t.deprecated,
            DataType::Object(t) => t.deprecated,
            DataType::Composed(t) => t.deprecated,
            DataType::Mapped(t) => t.deprecated,
            DataType::Untyped(t) => t.deprecated,
            _ => false,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(
            self,
            DataType::Mapped(_) | DataType::MappedCollection(_) | DataType::MappedMap(_)
        )
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DataType::None(_))
    }
}

fn with_generics(name: &str, generics: &[String]) -> String {
    if generics.is_empty() {
        return name.to_string();
    }
    let names: Vec<&str> = generics
        .iter()
        .map(|g| match g.rsplit_once('.') {
            Some((_, n)) => n,
            None => g.as_str(),
        })
        .collect();
    format!("{}<{}>", name, names.join(", "))
}
