//! Parser for the textual mapping DSL used in the mapping configuration,
//! e.g. `Foo:int64 => io.pkg.Annotation(key = "v") io.pkg.Target<io.pkg.Other>`.
//!
//! Grammar (informal):
//!
//! ```text
//! mapping      := type "=>" annotation? targetType
//!               | type "@" annotation
//!               | targetType
//! type         := sourceIdentifier (":" formatIdentifier)?
//!                 // the source position also admits content types,
//!                 // e.g. application/vnd.custom+json
//! annotation   := qualifiedName ("(" argList? ")")?
//! argList      := arg ("," arg)*
//! arg          := (identifier "=")? (number | string | identifier)
//! targetType   := qualifiedName genericArgs?
//! genericArgs  := "<" targetType ("," targetType)* ">"
//! ```
//!
//! A bare `targetType` (no `=>`) denotes a target-only entry, used by the
//! `single:`/`multi:`/`result:` shorthands. A qualified name segment may be
//! the `{package-name}` placeholder, resolved later against the options.

use indexmap::IndexMap;

use crate::error::MappingDslError;

/// What a parsed mapping line expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingKind {
    /// Replace a source type with a target type.
    #[default]
    Type,
    /// Attach an annotation to a source type.
    Annotate,
}

/// The structured result of parsing one mapping line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMapping {
    pub kind: MappingKind,
    pub source_type: Option<String>,
    pub source_format: Option<String>,
    pub target_type: Option<String>,
    pub target_generic_types: Vec<String>,
    pub annotation_type: Option<String>,
    pub annotation_parameters: IndexMap<String, String>,
}

/// Parse a single mapping line. Fails with a positioned error on any
/// malformed token sequence; it never silently truncates.
pub fn parse_mapping(input: &str) -> Result<ParsedMapping, MappingDslError> {
    Parser::new(input).parse()
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Result<ParsedMapping, MappingDslError> {
        let mut mapping = ParsedMapping::default();

        self.skip_ws();
        let first = self.parse_source_name()?;

        let mut format = None;
        if self.eat(':') {
            format = Some(self.parse_format_identifier()?);
        }

        self.skip_ws();
        if self.at_end() {
            if format.is_some() {
                return Err(self.error("expected '=>' after source type with format"));
            }
            mapping.target_type = Some(first);
            return Ok(mapping);
        }

        if self.peek() == Some('<') {
            if format.is_some() {
                return Err(self.error("expected '=>' after source type with format"));
            }
            mapping.target_type = Some(first);
            mapping.target_generic_types = self.parse_generic_args()?;
            self.expect_end()?;
            return Ok(mapping);
        }

        if self.eat('@') {
            self.skip_ws();
            let (annotation_type, parameters) = self.parse_annotation()?;
            self.expect_end()?;
            mapping.kind = MappingKind::Annotate;
            mapping.source_type = Some(first);
            mapping.source_format = format;
            mapping.annotation_type = Some(annotation_type);
            mapping.annotation_parameters = parameters;
            return Ok(mapping);
        }

        self.expect_arrow()?;
        self.skip_ws();
        mapping.source_type = Some(first);
        mapping.source_format = format;

        let mut name = self.parse_qualified_name()?;
        if self.peek() == Some('(') {
            let (annotation_type, parameters) = self.parse_annotation_args(name)?;
            mapping.annotation_type = Some(annotation_type);
            mapping.annotation_parameters = parameters;

            self.skip_ws();
            if self.at_end() {
                return Err(self.error("expected target type after annotation"));
            }
            name = self.parse_qualified_name()?;
        } else {
            // an argument-less annotation followed by the target type
            self.skip_ws();
            if matches!(self.peek(), Some(c) if c.is_alphabetic() || c == '_' || c == '{') {
                mapping.annotation_type = Some(name);
                name = self.parse_qualified_name()?;
            }
        }

        mapping.target_type = Some(name);
        if self.peek() == Some('<') {
            mapping.target_generic_types = self.parse_generic_args()?;
        }

        self.expect_end()?;
        Ok(mapping)
    }

    /// `qualifiedName (("." qualifiedName)*)`, a segment may be the
    /// `{package-name}` placeholder.
    fn parse_qualified_name(&mut self) -> Result<String, MappingDslError> {
        let mut name = String::new();
        loop {
            let segment = self.parse_name_segment()?;
            name.push_str(&segment);
            if !self.eat('.') {
                break;
            }
            name.push('.');
        }
        Ok(name)
    }

    /// Like [`parse_qualified_name`], but segments additionally accept the
    /// `/` and `+` of content types, so `responses:` sources like
    /// `application/vnd.custom+json` parse as one name.
    ///
    /// [`parse_qualified_name`]: Self::parse_qualified_name
    fn parse_source_name(&mut self) -> Result<String, MappingDslError> {
        let mut name = String::new();
        loop {
            let segment = self.parse_segment(true)?;
            name.push_str(&segment);
            if !self.eat('.') {
                break;
            }
            name.push('.');
        }
        Ok(name)
    }

    fn parse_name_segment(&mut self) -> Result<String, MappingDslError> {
        self.parse_segment(false)
    }

    fn parse_segment(&mut self, mime: bool) -> Result<String, MappingDslError> {
        if self.peek() == Some('{') {
            return self.parse_placeholder();
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric()
                || matches!(c, '_' | '$' | '-')
                || (mime && matches!(c, '/' | '+'))
            {
                self.pos += 1;
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// `{package-name}` style placeholder, kept verbatim including braces.
    fn parse_placeholder(&mut self) -> Result<String, MappingDslError> {
        let start = self.pos;
        self.pos += 1; // consume '{'
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '}' {
                return Ok(self.chars[start..self.pos].iter().collect());
            }
        }
        Err(self.error("unterminated placeholder"))
    }

    fn parse_format_identifier(&mut self) -> Result<String, MappingDslError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected format identifier after ':'"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// `"<" targetType ("," targetType)* ">"`; each argument is rendered back
    /// to its source text, including nested generics.
    fn parse_generic_args(&mut self) -> Result<Vec<String>, MappingDslError> {
        self.pos += 1; // consume '<'
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            args.push(self.parse_generic_type()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some('>') => {
                    self.pos += 1;
                    return Ok(args);
                }
                _ => return Err(self.error("unterminated generic argument list")),
            }
        }
    }

    fn parse_generic_type(&mut self) -> Result<String, MappingDslError> {
        let mut rendered = self.parse_qualified_name()?;
        if self.peek() == Some('<') {
            let nested = self.parse_generic_args()?;
            rendered.push('<');
            rendered.push_str(&nested.join(", "));
            rendered.push('>');
        }
        Ok(rendered)
    }

    fn parse_annotation(&mut self) -> Result<(String, IndexMap<String, String>), MappingDslError> {
        let name = self.parse_qualified_name()?;
        if self.peek() == Some('(') {
            self.parse_annotation_args(name)
        } else {
            Ok((name, IndexMap::new()))
        }
    }

    fn parse_annotation_args(
        &mut self,
        annotation_type: String,
    ) -> Result<(String, IndexMap<String, String>), MappingDslError> {
        self.pos += 1; // consume '('
        let mut parameters = IndexMap::new();

        self.skip_ws();
        if self.eat(')') {
            return Ok((annotation_type, parameters));
        }

        loop {
            self.skip_ws();
            let (key, value) = self.parse_annotation_arg()?;
            parameters.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(')') => {
                    self.pos += 1;
                    return Ok((annotation_type, parameters));
                }
                _ => return Err(self.error("unterminated annotation argument list")),
            }
        }
    }

    /// `(identifier "=")? (number | string | identifier)`; unnamed arguments
    /// are keyed by the empty string.
    fn parse_annotation_arg(&mut self) -> Result<(String, String), MappingDslError> {
        match self.peek() {
            Some('"') => Ok((String::new(), self.parse_string_literal()?)),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => {
                Ok((String::new(), self.parse_number_literal()?))
            }
            Some(_) => {
                let name = self.parse_qualified_name()?;
                self.skip_ws();
                if self.eat('=') {
                    self.skip_ws();
                    let value = self.parse_annotation_value()?;
                    Ok((name, value))
                } else {
                    Ok((String::new(), name))
                }
            }
            None => Err(self.error("expected annotation argument")),
        }
    }

    fn parse_annotation_value(&mut self) -> Result<String, MappingDslError> {
        match self.peek() {
            Some('"') => self.parse_string_literal(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => self.parse_number_literal(),
            Some(_) => self.parse_qualified_name(),
            None => Err(self.error("expected annotation argument value")),
        }
    }

    /// A double quoted string, kept verbatim including the quotes.
    fn parse_string_literal(&mut self) -> Result<String, MappingDslError> {
        let start = self.pos;
        self.pos += 1; // consume '"'
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '"' {
                return Ok(self.chars[start..self.pos].iter().collect());
            }
        }
        Err(self.error("unterminated string literal"))
    }

    fn parse_number_literal(&mut self) -> Result<String, MappingDslError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == digits_start {
            return Err(self.error("malformed number literal"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn expect_arrow(&mut self) -> Result<(), MappingDslError> {
        if self.peek() == Some('=') && self.chars.get(self.pos + 1) == Some(&'>') {
            self.pos += 2;
            Ok(())
        } else {
            Err(self.error("expected '=>'"))
        }
    }

    fn expect_end(&mut self) -> Result<(), MappingDslError> {
        self.skip_ws();
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, detail: &str) -> MappingDslError {
        let consumed: String = self.chars[..self.pos].iter().collect();
        let line = consumed.matches('\n').count() + 1;
        let column = match consumed.rsplit_once('\n') {
            Some((_, last)) => last.chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        MappingDslError {
            line,
            column,
            detail: detail.to_string(),
            input: self.input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_type_mapping() {
        let m = parse_mapping("Foo => io.pkg.Target<java.lang.String>").unwrap();
        assert_eq!(m.kind, MappingKind::Type);
        assert_eq!(m.source_type.as_deref(), Some("Foo"));
        assert_eq!(m.source_format, None);
        assert_eq!(m.target_type.as_deref(), Some("io.pkg.Target"));
        assert_eq!(m.target_generic_types, vec!["java.lang.String"]);
    }

    #[test]
    fn parses_source_format() {
        let m = parse_mapping("Foo:int64 => io.pkg.Target").unwrap();
        assert_eq!(m.source_type.as_deref(), Some("Foo"));
        assert_eq!(m.source_format.as_deref(), Some("int64"));
        assert_eq!(m.target_type.as_deref(), Some("io.pkg.Target"));
    }

    #[test]
    fn parses_dashed_format() {
        let m = parse_mapping("string:date-time => java.time.Instant").unwrap();
        assert_eq!(m.source_format.as_deref(), Some("date-time"));
    }

    #[test]
    fn parses_content_type_source() {
        let m = parse_mapping("application/vnd.custom => io.pkg.Custom").unwrap();
        assert_eq!(m.source_type.as_deref(), Some("application/vnd.custom"));
        assert_eq!(m.target_type.as_deref(), Some("io.pkg.Custom"));
    }

    #[test]
    fn parses_content_type_source_with_suffix() {
        let m = parse_mapping("application/vnd.custom+json => io.pkg.Custom").unwrap();
        assert_eq!(m.source_type.as_deref(), Some("application/vnd.custom+json"));
    }

    #[test]
    fn parses_annotation_with_named_argument() {
        let m = parse_mapping("Foo => io.pkg.Annotation(bar = 42) io.pkg.Target").unwrap();
        assert_eq!(m.annotation_type.as_deref(), Some("io.pkg.Annotation"));
        assert_eq!(m.annotation_parameters.get("bar").unwrap(), "42");
        assert_eq!(m.target_type.as_deref(), Some("io.pkg.Target"));
    }

    #[test]
    fn parses_annotation_arguments_in_order() {
        let m = parse_mapping(r#"Foo => io.pkg.A(42, key = "v") io.pkg.Target"#).unwrap();
        let params: Vec<_> = m.annotation_parameters.iter().collect();
        assert_eq!(params[0], (&String::new(), &"42".to_string()));
        assert_eq!(params[1], (&"key".to_string(), &"\"v\"".to_string()));
    }

    #[test]
    fn parses_annotation_without_arguments() {
        let m = parse_mapping("Foo => io.pkg.Annotation io.pkg.Target").unwrap();
        assert_eq!(m.annotation_type.as_deref(), Some("io.pkg.Annotation"));
        assert!(m.annotation_parameters.is_empty());
        assert_eq!(m.target_type.as_deref(), Some("io.pkg.Target"));
    }

    #[test]
    fn parses_annotate_kind() {
        let m = parse_mapping(r#"Foo @ io.pkg.Valid(strict = true)"#).unwrap();
        assert_eq!(m.kind, MappingKind::Annotate);
        assert_eq!(m.source_type.as_deref(), Some("Foo"));
        assert_eq!(m.annotation_type.as_deref(), Some("io.pkg.Valid"));
        assert_eq!(m.annotation_parameters.get("strict").unwrap(), "true");
        assert_eq!(m.target_type, None);
    }

    #[test]
    fn parses_bare_target_type() {
        let m = parse_mapping("reactor.core.publisher.Mono").unwrap();
        assert_eq!(m.source_type, None);
        assert_eq!(m.target_type.as_deref(), Some("reactor.core.publisher.Mono"));
    }

    #[test]
    fn parses_bare_plain_marker() {
        let m = parse_mapping("plain").unwrap();
        assert_eq!(m.target_type.as_deref(), Some("plain"));
    }

    #[test]
    fn parses_nested_generics() {
        let m = parse_mapping("Foo => io.pkg.Map<java.lang.String, io.pkg.List<java.lang.Long>>")
            .unwrap();
        assert_eq!(
            m.target_generic_types,
            vec!["java.lang.String", "io.pkg.List<java.lang.Long>"]
        );
    }

    #[test]
    fn parses_package_placeholder() {
        let m = parse_mapping("Foo => {package-name}.model.Foo").unwrap();
        assert_eq!(m.target_type.as_deref(), Some("{package-name}.model.Foo"));
    }

    #[test]
    fn fails_on_unterminated_generics() {
        let err = parse_mapping("Foo => io.pkg.Target<java.lang.String").unwrap_err();
        assert!(err.detail.contains("unterminated generic"));
        assert_eq!(err.line, 1);
        assert!(err.column > 1);
    }

    #[test]
    fn fails_on_unterminated_string() {
        let err = parse_mapping(r#"Foo => io.pkg.A(key = "v) io.pkg.Target"#).unwrap_err();
        assert!(err.detail.contains("unterminated string"));
    }

    #[test]
    fn fails_on_missing_target() {
        let err = parse_mapping("Foo => ").unwrap_err();
        assert!(err.detail.contains("expected identifier"));
    }

    #[test]
    fn fails_on_trailing_input() {
        let err = parse_mapping("Foo => io.pkg.Target garbage !").unwrap_err();
        assert!(err.detail.contains("unexpected trailing input"));
    }

    #[test]
    fn fails_on_format_without_target() {
        let err = parse_mapping("Foo:int64").unwrap_err();
        assert!(err.detail.contains("expected '=>'"));
    }
}
