//! Type mapping rules, the textual mapping DSL and the rule lookup engine.

pub mod dsl;
pub mod finder;
pub mod rules;

pub use finder::{MappingFinder, MappingSchema};
pub use rules::Mapping;
