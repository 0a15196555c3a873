//! Naming helpers for generated types.

use heck::ToPascalCase;

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Turn an arbitrary identifier or path into a class name, e.g.
/// `/foo/{id}` becomes `FooId`.
pub fn to_class(s: &str) -> String {
    s.to_pascal_case()
}
