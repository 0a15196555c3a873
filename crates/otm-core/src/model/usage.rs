//! Counts usages of named model types so unreferenced types can be dropped
//! from the generated output.

use super::datatypes::DataType;
use super::registry::DataTypes;

/// Walks a resolved type tree and bumps the registry ref counter of every
/// named type it reaches.
pub struct DataTypeCollector<'a> {
    data_types: &'a mut DataTypes,
    package_name: String,
}

impl<'a> DataTypeCollector<'a> {
    pub fn new(data_types: &'a mut DataTypes, package_name: impl Into<String>) -> Self {
        Self {
            data_types,
            package_name: package_name.into(),
        }
    }

    pub fn collect(&mut self, data_type: &DataType) {
        match data_type {
            DataType::Primitive(_) | DataType::Untyped(_) | DataType::None(_) => {}
            DataType::StringEnum(t) => self.data_types.add_ref(&t.name.id),
            DataType::Array(t) => self.collect(&t.item),
            DataType::Object(t) => {
                self.data_types.add_ref(&t.name.id);
                for property in t.properties.values() {
                    self.collect(property);
                }
            }
            DataType::Composed(t) => {
                self.data_types.add_ref(&t.name.id);
                for item in &t.items {
                    self.collect(item);
                }
            }
            DataType::Interface(t) => {
                self.data_types.add_ref(&t.name.id);
                for item in &t.items {
                    self.data_types.add_ref(item);
                    if let Some(found) = self.data_types.find(item).cloned() {
                        for property in object_properties(&found) {
                            self.collect(property);
                        }
                    }
                }
            }
            DataType::Mapped(t) => self.collect_generics(&t.generic_types),
            DataType::MappedCollection(t) => self.collect(&t.item),
            DataType::MappedMap(t) => self.collect_generics(&t.generic_types),
            DataType::Single(t) => self.collect(&t.item),
            DataType::Result(t) => self.collect(&t.item),
            DataType::Null(t) => self.collect(&t.item),
            // cycle breaker, counted but never followed
            DataType::Lazy(t) => self.data_types.add_ref(&t.name),
        }
    }

    /// Generics pointing into the generated package count as usages of the
    /// named model type. They are not followed, only counted, because the
    /// generic is a name and carries no cycle breaker.
    fn collect_generics(&mut self, generic_types: &[String]) {
        for generic in generic_types {
            if !generic.starts_with(&self.package_name) {
                continue;
            }
            let name = match generic.rsplit_once('.') {
                Some((_, n)) => n,
                None => generic.as_str(),
            };
            self.data_types.add_ref(name);
        }
    }
}

fn object_properties(data_type: &DataType) -> impl Iterator<Item = &DataType> {
    match data_type {
        DataType::Object(obj) => Some(obj.properties.values()),
        _ => None,
    }
    .into_iter()
    .flatten()
}
