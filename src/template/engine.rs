//! Template rendering with real or example values

use std::collections::HashMap;

use crate::metrics::TemplateMetrics;

use super::parser::{self, SyntaxError};

/// Variable values bound to a single recipient
pub type TemplateContext = HashMap<String, String>;

/// Renders message templates.
///
/// Holds the canned example values used for previews. Rendering never fails:
/// unknown variables become empty strings and malformed text is copied literally.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    examples: HashMap<String, String>,
}

impl TemplateEngine {
    pub fn new(examples: HashMap<String, String>) -> Self {
        Self { examples }
    }

    /// Check template syntax
    pub fn validate(&self, text: &str) -> Result<(), SyntaxError> {
        parser::validate(text)
    }

    /// Render `text` against `context`, or against the example values when
    /// `use_examples` is set.
    pub fn render(&self, text: &str, context: &TemplateContext, use_examples: bool) -> String {
        let parsed = parser::parse_lenient(text);
        TemplateMetrics::record_render(use_examples);

        let values = if use_examples { &self.examples } else { context };
        parsed.render_with(|name| values.get(name).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TemplateEngine {
        let mut examples = HashMap::new();
        examples.insert("first_name".to_string(), "John".to_string());
        examples.insert("last_name".to_string(), "Doe".to_string());
        TemplateEngine::new(examples)
    }

    fn context(pairs: &[(&str, &str)]) -> TemplateContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_missing_variable_is_empty() {
        assert_eq!(engine().render("{{x}}", &TemplateContext::new(), false), "");
    }

    #[test]
    fn test_render_bound_variable() {
        assert_eq!(engine().render("{{x}}", &context(&[("x", "v")]), false), "v");
    }

    #[test]
    fn test_render_with_examples() {
        let rendered = engine().render("Hello, {{first_name}}!", &TemplateContext::new(), true);
        assert_eq!(rendered, "Hello, John!");
    }

    #[test]
    fn test_render_examples_ignore_context() {
        let rendered = engine().render(
            "{{first_name}} {{last_name}}",
            &context(&[("first_name", "Richard")]),
            true,
        );
        assert_eq!(rendered, "John Doe");
    }

    #[test]
    fn test_render_with_real_values() {
        let rendered = engine().render(
            "Hello, {{first_name}}!",
            &context(&[("first_name", "Richard")]),
            false,
        );
        assert_eq!(rendered, "Hello, Richard!");
    }

    #[test]
    fn test_render_unknown_example_is_empty() {
        let rendered = engine().render("Hello {{foo}} World", &TemplateContext::new(), true);
        assert_eq!(rendered, "Hello  World");
    }

    #[test]
    fn test_render_invalid_text_does_not_fail() {
        let rendered = engine().render(
            "Hi {{first_name}}, {{oops",
            &context(&[("first_name", "Ann")]),
            false,
        );
        assert_eq!(rendered, "Hi Ann, {{oops");
    }

    #[test]
    fn test_examples_ignore_caller_context() {
        let rendered = engine().render(
            "{{first_name}} {{missing}}",
            &context(&[("first_name", "Ann"), ("missing", "x")]),
            true,
        );
        assert_eq!(rendered, "John ");
    }
}
