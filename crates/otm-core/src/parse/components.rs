use indexmap::IndexMap;
use serde::Deserialize;

use super::schema::Schema;

/// The `components` section, reduced to what the converter consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
}
