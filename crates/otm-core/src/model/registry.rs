//! Registry of the named types created during conversion. Generated model
//! types and mapped replacement types live in separate namespaces so a
//! mapping can shadow a model type without losing it.

use indexmap::IndexMap;

use super::datatypes::DataType;

#[derive(Debug, Default)]
pub struct DataTypes {
    types: IndexMap<String, DataType>,
    mapped: IndexMap<String, DataType>,
    refs: IndexMap<String, usize>,
}

impl DataTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its registry key, usually the source schema
    /// name. Mapped types go to their own namespace, so the replacement of a
    /// schema can shadow the generated type without losing it.
    pub fn add(&mut self, name: impl Into<String>, data_type: DataType) {
        let name = name.into();
        self.refs.entry(name.clone()).or_insert(0);
        if data_type.is_mapped() {
            self.mapped.insert(name, data_type);
        } else {
            self.types.insert(name, data_type);
        }
    }

    /// Look up a type by key, mapped namespace first.
    pub fn find(&self, name: &str) -> Option<&DataType> {
        self.mapped.get(name).or_else(|| self.types.get(name))
    }

    pub fn del(&mut self, name: &str) {
        self.types.shift_remove(name);
        self.mapped.shift_remove(name);
        self.refs.shift_remove(name);
    }

    /// Count a usage of a named type.
    pub fn add_ref(&mut self, name: &str) {
        *self.refs.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn ref_count(&self, name: &str) -> usize {
        self.refs.get(name).copied().unwrap_or(0)
    }

    /// The generated model types (objects, compositions, interfaces) that
    /// are actually used.
    pub fn model_data_types(&self) -> Vec<&DataType> {
        self.types
            .iter()
            .filter(|(name, dt)| {
                self.ref_count(name) > 0
                    && matches!(
                        dt,
                        DataType::Object(_) | DataType::Composed(_) | DataType::Interface(_)
                    )
            })
            .map(|(_, dt)| dt)
            .collect()
    }

    /// The generated enum types that are actually used.
    pub fn enum_data_types(&self) -> Vec<&DataType> {
        self.types
            .iter()
            .filter(|(name, dt)| self.ref_count(name) > 0 && matches!(dt, DataType::StringEnum(_)))
            .map(|(_, dt)| dt)
            .collect()
    }

    /// Record that a model type implements a marker interface.
    pub fn mark_implements(&mut self, name: &str, interface: &str) {
        if let Some(DataType::Object(obj)) = self.types.get_mut(name) {
            if !obj.implements.iter().any(|i| i == interface) {
                obj.implements.push(interface.to_string());
            }
        }
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}
