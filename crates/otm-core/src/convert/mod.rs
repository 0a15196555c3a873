//! Conversion of a parsed API description into the resolved model.

pub mod api_converter;
pub mod converter;
pub mod name;
pub mod schema_info;
pub mod wrapper;

pub use api_converter::ApiConverter;
pub use converter::DataTypeConverter;
pub use schema_info::SchemaInfo;
