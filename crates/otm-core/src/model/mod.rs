//! The converted model: the resolved type tree, the registry of named types
//! and the API surface built from the description.

pub mod api;
pub mod datatypes;
pub mod registry;
pub mod usage;

pub use api::{Api, Endpoint, EndpointResponse, Interface};
pub use datatypes::{DataType, DataTypeConstraints, DataTypeName};
pub use registry::DataTypes;
