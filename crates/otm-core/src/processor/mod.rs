//! Reads the mapping configuration (`mapping.yaml`) and turns it into
//! [`ApiOptions`] with a flat list of mapping rules.

mod reader;

pub use reader::from_yaml;
