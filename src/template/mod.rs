//! Message template language.
//!
//! Subjects and bodies may contain `{{variable}}` placeholders. This module provides:
//! - A strict parser used at validation time (`parse` / `validate`)
//! - A total renderer used at display time (`TemplateEngine::render`)
//! - Example values for previewing a message without a bound recipient
//!
//! # Example
//!
//! ```ignore
//! let engine = TemplateEngine::new(examples);
//!
//! engine.validate("Hello, {{first_name}}!")?;
//!
//! let mut context = TemplateContext::new();
//! context.insert("first_name".to_string(), "Richard".to_string());
//!
//! assert_eq!(engine.render("Hello, {{first_name}}!", &context, false), "Hello, Richard!");
//! assert_eq!(engine.render("Hello, {{first_name}}!", &context, true), "Hello, John!");
//! ```

mod engine;
mod parser;

pub use engine::{TemplateContext, TemplateEngine};
pub use parser::{parse, parse_lenient, validate, ParsedTemplate, Segment, SyntaxError};
