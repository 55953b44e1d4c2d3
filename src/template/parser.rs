//! Placeholder parser

use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Template syntax error. Offsets are byte positions in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("failed to parse template: unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },

    #[error("failed to parse template: invalid variable name {name:?} at byte {offset}")]
    InvalidVariable { name: String, offset: usize },

    #[error("failed to parse template: unexpected '}}}}' at byte {offset}")]
    UnexpectedClose { offset: usize },
}

/// A piece of parsed template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output as-is
    Literal(String),
    /// A `{{name}}` placeholder
    Variable(String),
}

/// A template split into literal runs and placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
    segments: Vec<Segment>,
}

impl ParsedTemplate {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct variable names in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Render by resolving each variable through `lookup`; misses render empty.
    pub fn render_with<'a, F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Variable(name) => output.push_str(lookup(name).unwrap_or_default()),
            }
        }
        output
    }
}

/// Parse template text, rejecting malformed placeholders.
pub fn parse(text: &str) -> Result<ParsedTemplate, SyntaxError> {
    scan(text, true)
}

/// Parse template text, keeping malformed brace sequences as literal text.
pub fn parse_lenient(text: &str) -> ParsedTemplate {
    // Lenient scanning never produces an error
    scan(text, false).unwrap_or_else(|_| ParsedTemplate {
        segments: vec![Segment::Literal(text.to_string())],
    })
}

/// Check template syntax without rendering.
pub fn validate(text: &str) -> Result<(), SyntaxError> {
    parse(text).map(|_| ())
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn scan(text: &str, strict: bool) -> Result<ParsedTemplate, SyntaxError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let open = rest.find(OPEN);
        let close = rest.find(CLOSE);

        // A closing pair that comes before any opening pair is stray
        if let Some(c) = close {
            if open.map_or(true, |o| c < o) {
                if strict {
                    return Err(SyntaxError::UnexpectedClose { offset: pos + c });
                }
                literal.push_str(&rest[..c + CLOSE.len()]);
                pos += c + CLOSE.len();
                continue;
            }
        }

        let Some(o) = open else {
            literal.push_str(rest);
            break;
        };

        literal.push_str(&rest[..o]);
        let inner_start = o + OPEN.len();
        let inner = &rest[inner_start..];

        let Some(end) = inner.find(CLOSE) else {
            if strict {
                return Err(SyntaxError::Unterminated { offset: pos + o });
            }
            literal.push_str(&rest[o..]);
            break;
        };

        let name = inner[..end].trim();
        if is_variable_name(name) {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Variable(name.to_string()));
            pos += inner_start + end + CLOSE.len();
        } else if strict {
            return Err(SyntaxError::InvalidVariable {
                name: name.to_string(),
                offset: pos + o,
            });
        } else {
            literal.push_str(OPEN);
            pos += inner_start;
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(ParsedTemplate { segments })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_only() {
        let parsed = parse("plain text, no variables").unwrap();
        assert_eq!(
            parsed.segments(),
            &[Segment::Literal("plain text, no variables".to_string())]
        );
        assert!(parsed.variables().is_empty());
    }

    #[test]
    fn test_parse_variables() {
        let parsed = parse("Hi {{first_name}} {{last_name}}, bye {{first_name}}").unwrap();
        assert_eq!(parsed.variables(), vec!["first_name", "last_name"]);
        assert_eq!(parsed.segments().len(), 6);
    }

    #[test]
    fn test_parse_trims_inner_whitespace() {
        let parsed = parse("{{ first_name }}").unwrap();
        assert_eq!(
            parsed.segments(),
            &[Segment::Variable("first_name".to_string())]
        );
    }

    #[test]
    fn test_validate_unterminated() {
        let err = validate("this body has invalid syntax {{foo").unwrap_err();
        assert_eq!(err, SyntaxError::Unterminated { offset: 29 });
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_validate_valid_variable() {
        assert!(validate("this body has valid syntax {{foo_bar}}").is_ok());
        assert!(validate("").is_ok());
        assert!(validate("single { braces } are fine").is_ok());
    }

    #[test]
    fn test_validate_invalid_variable_names() {
        for text in ["{{}}", "{{foo bar}}", "{{user.name}}", "{{{foo}}}"] {
            let err = validate(text).unwrap_err();
            assert!(
                matches!(err, SyntaxError::InvalidVariable { .. }),
                "expected invalid variable for {:?}, got {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_validate_stray_close() {
        let err = validate("oops }} here").unwrap_err();
        assert_eq!(err, SyntaxError::UnexpectedClose { offset: 5 });
        assert!(err.to_string().contains("'}}'"));
    }

    #[test]
    fn test_lenient_keeps_malformed_text() {
        let parsed = parse_lenient("Hello {{name}} and {{broken");
        let rendered = parsed.render_with(|_| Some("Ann"));
        assert_eq!(rendered, "Hello Ann and {{broken");

        let parsed = parse_lenient("{{not valid}} then {{ok}}");
        let rendered = parsed.render_with(|name| (name == "ok").then_some("yes"));
        assert_eq!(rendered, "{{not valid}} then yes");

        let parsed = parse_lenient("}} first");
        assert_eq!(parsed.render_with(|_| None), "}} first");
    }

    #[test]
    fn test_render_with_missing_values() {
        let parsed = parse("Hello {{foo}} World").unwrap();
        assert_eq!(parsed.render_with(|_| None), "Hello  World");
    }
}
