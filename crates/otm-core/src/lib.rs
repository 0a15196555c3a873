//! Converts OpenAPI descriptions into a resolved, typed model.
//!
//! The conversion is controlled by layered type mapping rules: global rules,
//! parameter and response rules, and endpoint scoped rules that override
//! them. Rules are written in a small textual DSL and usually read from a
//! mapping configuration file via [`processor`].
//!
//! ```no_run
//! use otm_core::{convert, processor, ApiOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = processor::from_yaml(&std::fs::read_to_string("mapping.yaml")?)?;
//! let api = convert(&std::fs::read_to_string("openapi.yaml")?, &options)?;
//!
//! for interface in &api.interfaces {
//!     println!("{} ({} endpoints)", interface.name, interface.endpoints.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod mapping;
pub mod model;
pub mod parse;
pub mod processor;

pub use config::ApiOptions;
pub use convert::ApiConverter;
pub use error::{ConvertError, MappingError, ParseError};
pub use model::Api;

/// Parse an API description from YAML and convert it with the given options.
pub fn convert(yaml: &str, options: &ApiOptions) -> Result<Api, ConvertError> {
    let spec = parse::from_yaml(yaml)?;
    ApiConverter::new(options).convert(&spec)
}
