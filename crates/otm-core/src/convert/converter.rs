//! Converts schemas into resolved data types. Mapping rules are consulted
//! before a type is generated, `$ref` cycles are broken with lazy
//! references, every named type ends up in the registry.

use indexmap::IndexMap;

use crate::config::ApiOptions;
use crate::error::ConvertError;
use crate::mapping::rules::TypeMapping;
use crate::mapping::{MappingFinder, MappingSchema};
use crate::model::datatypes::{
    ArrayDataType, ComposedDataType, ComposedStyle, DataType, DataTypeConstraints, DataTypeName,
    InterfaceDataType, LazyDataType, MappedCollectionDataType, MappedDataType, MappedMapDataType,
    ObjectDataType, PrimitiveDataType, PrimitiveKind, StringEnumDataType, UntypedDataType,
};
use crate::model::registry::DataTypes;
use crate::model::usage::DataTypeCollector;
use crate::parse::schema::{ComposedKind, Schema};

use super::name::capitalize_first;
use super::schema_info::SchemaInfo;
use super::wrapper::NullDataTypeWrapper;

/// Targets treated as map types, they replace the object instead of
/// shadowing it.
const MAP_TARGETS: [&str; 2] = ["java.util.Map", "org.springframework.util.MultiValueMap"];

pub struct DataTypeConverter<'a> {
    options: &'a ApiOptions,
    finder: &'a MappingFinder,
    current: Vec<StackEntry>,
}

struct StackEntry {
    name: String,
    is_ref: bool,
}

impl<'a> DataTypeConverter<'a> {
    pub fn new(options: &'a ApiOptions, finder: &'a MappingFinder) -> Self {
        Self {
            options,
            finder,
            current: Vec::new(),
        }
    }

    /// Convert the schema under the cursor. When the outermost conversion
    /// finishes, usages of the named types it reached are counted.
    pub fn convert(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        if self.is_loop(info) {
            return Ok(DataType::Lazy(LazyDataType {
                name: info.name.clone(),
            }));
        }

        self.current.push(StackEntry {
            name: info.name.clone(),
            is_ref: info.is_ref(),
        });
        let result = self.create_data_type(info, data_types);
        self.current.pop();
        let data_type = result?;

        if self.current.is_empty() {
            DataTypeCollector::new(data_types, &self.options.package_name).collect(&data_type);
        }
        Ok(data_type)
    }

    /// A schema is part of a cycle when its name is already being converted
    /// further up the stack. Unresolved `$ref` cursors still carry their
    /// parent-derived name, they never count.
    fn is_loop(&self, info: &SchemaInfo) -> bool {
        if info.is_ref() {
            return false;
        }
        self.current
            .iter()
            .any(|entry| !entry.is_ref && entry.name == info.name)
    }

    fn create_data_type(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        if info.is_ref() {
            let resolved = info.for_ref()?;
            return self.convert(&resolved, data_types);
        }
        if info.is_composed() {
            return self.create_composed(info, data_types);
        }
        if info.is_array() {
            return self.create_array(info, data_types);
        }
        if info.is_object() {
            return self.create_object(info, data_types);
        }
        if info.is_untyped() {
            return Ok(self.create_no_type(info));
        }
        self.create_simple(info, data_types)
    }

    fn create_composed(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        if let Some(mapping) = self.finder.find_type_mapping(info)? {
            return Ok(self.create_mapped(&mapping, false));
        }

        let items = info.composed_items();
        let mut converted = Vec::with_capacity(items.len());
        for item in &items {
            converted.push(self.convert(item, data_types)?);
        }

        match info.composed_kind() {
            Some(ComposedKind::AllOf) => self.create_all_of(info, converted, data_types),
            Some(kind) => self.create_one_of(info, kind, converted, data_types),
            None => Ok(self.create_no_type(info)),
        }
    }

    /// Merge the branches of an `allOf` into one object, properties in
    /// branch order, later branches override earlier ones.
    fn create_all_of(
        &mut self,
        info: &SchemaInfo,
        items: Vec<DataType>,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        let mut meaningful: Vec<DataType> = items
            .into_iter()
            .filter(|item| !matches!(item, DataType::Untyped(_)))
            .collect();
        if meaningful.len() == 1 {
            return Ok(meaningful.remove(0));
        }

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for item in &meaningful {
            let object = match item {
                DataType::Object(object) => Some(object.clone()),
                DataType::Lazy(lazy) => match data_types.find(&lazy.name) {
                    Some(DataType::Object(object)) => Some(object.clone()),
                    _ => None,
                },
                _ => None,
            };
            let Some(object) = object else {
                continue;
            };
            for (prop, prop_type) in object.properties {
                properties.insert(prop, prop_type);
            }
            required.extend(object.constraints.required);
        }

        let object = ObjectDataType {
            name: DataTypeName::with_suffix(info.name.clone(), &self.options.model_name_suffix),
            pkg: self.options.model_pkg(),
            properties,
            constraints: DataTypeConstraints {
                required,
                ..constraints_of(info)
            },
            deprecated: info.is_deprecated(),
            all_of: true,
            implements: Vec::new(),
        };
        data_types.add(&info.name, DataType::Object(object.clone()));
        Ok(DataType::Object(object))
    }

    /// A `oneOf`/`anyOf` of model objects becomes a marker interface the
    /// objects implement, anything else stays a composition.
    fn create_one_of(
        &mut self,
        info: &SchemaInfo,
        kind: ComposedKind,
        items: Vec<DataType>,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        let item_names: Vec<&str> = items
            .iter()
            .filter_map(|item| match item {
                DataType::Object(object) => Some(object.name.id.as_str()),
                DataType::Lazy(lazy) => Some(lazy.name.as_str()),
                _ => None,
            })
            .collect();

        if !items.is_empty() && item_names.len() == items.len() {
            let interface = InterfaceDataType {
                name: DataTypeName::with_suffix(
                    info.name.clone(),
                    &self.options.model_name_suffix,
                ),
                pkg: self.options.model_pkg(),
                items: item_names.iter().map(|n| n.to_string()).collect(),
            };
            for item_name in &interface.items {
                data_types.mark_implements(item_name, &interface.name.type_id);
            }
            data_types.add(&info.name, DataType::Interface(interface.clone()));
            return Ok(DataType::Interface(interface));
        }

        let style = match kind {
            ComposedKind::AnyOf => ComposedStyle::AnyOf,
            _ => ComposedStyle::OneOf,
        };
        let composed = ComposedDataType {
            name: DataTypeName::with_suffix(info.name.clone(), &self.options.model_name_suffix),
            pkg: self.options.model_pkg(),
            style,
            items,
            constraints: constraints_of(info),
            deprecated: info.is_deprecated(),
        };
        data_types.add(&info.name, DataType::Composed(composed.clone()));
        Ok(DataType::Composed(composed))
    }

    fn create_array(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        let mapping = self.finder.find_type_mapping(info)?;
        let item = self.convert(&info.for_item(), data_types)?;

        if let Some(mapping) = mapping {
            let target = self.resolve_target(&mapping);
            return Ok(DataType::MappedCollection(MappedCollectionDataType {
                name: target.name().to_string(),
                pkg: target.pkg().to_string(),
                item: Box::new(item),
            }));
        }

        Ok(DataType::Array(ArrayDataType {
            item: Box::new(item),
            constraints: constraints_of(info),
            deprecated: info.is_deprecated(),
        }))
    }

    fn create_object(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        let mapping = self.finder.find_type_mapping(info)?;

        if let Some(mapping) = &mapping {
            let target = self.resolve_target(mapping);
            if MAP_TARGETS.contains(&target.type_name.as_str()) {
                return Ok(DataType::MappedMap(MappedMapDataType {
                    name: target.name().to_string(),
                    pkg: target.pkg().to_string(),
                    generic_types: target.generic_names.clone(),
                }));
            }
        }

        let object = self.build_object(info, data_types)?;
        data_types.add(&info.name, DataType::Object(object.clone()));

        if let Some(mapping) = mapping {
            let mapped = self.create_mapped(&mapping, false);
            data_types.add(&info.name, mapped.clone());
            return Ok(mapped);
        }
        Ok(DataType::Object(object))
    }

    fn build_object(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<ObjectDataType, ConvertError> {
        let mut properties = IndexMap::new();
        for (prop_name, prop_info) in info.properties() {
            let mut prop_type = self.convert(&prop_info, data_types)?;
            if prop_info.is_nullable() {
                prop_type = NullDataTypeWrapper::new(self.finder).wrap(&prop_info, prop_type);
            }
            properties.insert(prop_name, prop_type);
        }

        Ok(ObjectDataType {
            name: DataTypeName::with_suffix(info.name.clone(), &self.options.model_name_suffix),
            pkg: self.options.model_pkg(),
            properties,
            constraints: constraints_of(info),
            deprecated: info.is_deprecated(),
            all_of: false,
            implements: Vec::new(),
        })
    }

    fn create_simple(
        &mut self,
        info: &SchemaInfo,
        data_types: &mut DataTypes,
    ) -> Result<DataType, ConvertError> {
        if let Some(mapping) = self.finder.find_type_mapping(info)? {
            return Ok(self.create_mapped(&mapping, true));
        }

        if info.is_enum() && info.schema_type() == Some("string") {
            return Ok(self.create_string_enum(info, data_types));
        }

        let kind = primitive_kind(info.schema_type(), info.format()).ok_or_else(|| {
            ConvertError::UnknownDataType {
                name: info.name.clone(),
                schema_type: info.schema_type().unwrap_or_default().to_string(),
                format: info.format().map(str::to_string),
            }
        })?;

        Ok(DataType::Primitive(PrimitiveDataType {
            kind,
            constraints: constraints_of(info),
            deprecated: info.is_deprecated(),
        }))
    }

    fn create_string_enum(&self, info: &SchemaInfo, data_types: &mut DataTypes) -> DataType {
        let name = capitalize_first(&info.name);
        let string_enum = StringEnumDataType {
            name: DataTypeName::with_suffix(name.clone(), &self.options.model_name_suffix),
            pkg: self.options.model_pkg(),
            values: info.schema.map(Schema::enum_strings).unwrap_or_default(),
            constraints: constraints_of(info),
            deprecated: info.is_deprecated(),
        };
        data_types.add(name, DataType::StringEnum(string_enum.clone()));
        DataType::StringEnum(string_enum)
    }

    /// A schema that declares no type, e.g. a `description`-only `allOf`
    /// branch. The marker keeps the occurrence name and constraints.
    fn create_no_type(&self, info: &SchemaInfo) -> DataType {
        DataType::Untyped(UntypedDataType {
            name: DataTypeName::new(info.name.clone()),
            constraints: constraints_of(info),
            deprecated: info.is_deprecated(),
        })
    }

    /// Build the replacement type of a matched mapping rule.
    pub fn create_mapped(&self, mapping: &TypeMapping, simple: bool) -> DataType {
        let target = self.resolve_target(mapping);
        DataType::Mapped(MappedDataType {
            name: target.name().to_string(),
            pkg: target.pkg().to_string(),
            generic_types: target.generic_names.clone(),
            deprecated: false,
            simple,
        })
    }

    fn resolve_target(&self, mapping: &TypeMapping) -> crate::mapping::rules::TargetType {
        let mut target = mapping.target_type();
        target.type_name = self.options.resolve_package(&target.type_name);
        target.generic_names = target
            .generic_names
            .iter()
            .map(|g| self.options.resolve_package(g))
            .collect();
        target
    }
}

fn constraints_of(info: &SchemaInfo) -> DataTypeConstraints {
    let Some(schema) = info.schema else {
        return DataTypeConstraints::default();
    };
    DataTypeConstraints {
        default_value: schema.default_value.clone(),
        nullable: schema.nullable,
        minimum: schema.minimum,
        exclusive_minimum: schema.exclusive_minimum,
        maximum: schema.maximum,
        exclusive_maximum: schema.exclusive_maximum,
        min_length: schema.min_length,
        max_length: schema.max_length,
        min_items: schema.min_items,
        max_items: schema.max_items,
        pattern: schema.pattern.clone(),
        required: schema.required.clone(),
        values: schema.enum_strings(),
    }
}

/// The built-in primitive table. Formats outside the known set do not
/// narrow the lookup, an unknown but significant combination fails.
fn primitive_kind(schema_type: Option<&str>, format: Option<&str>) -> Option<PrimitiveKind> {
    const SIGNIFICANT: [&str; 6] = ["int32", "int64", "float", "double", "date", "date-time"];

    let schema_type = schema_type?;
    let format = format.filter(|f| SIGNIFICANT.contains(f));

    match (schema_type, format) {
        ("integer", None | Some("int32")) => Some(PrimitiveKind::Integer),
        ("integer", Some("int64")) => Some(PrimitiveKind::Long),
        ("number", None | Some("float")) => Some(PrimitiveKind::Float),
        ("number", Some("double")) => Some(PrimitiveKind::Double),
        ("string", None) => Some(PrimitiveKind::String),
        ("string", Some("date")) => Some(PrimitiveKind::LocalDate),
        ("string", Some("date-time")) => Some(PrimitiveKind::OffsetDateTime),
        ("boolean", None) => Some(PrimitiveKind::Boolean),
        _ => None,
    }
}
