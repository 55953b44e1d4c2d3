//! Known-value tables for message validation and recipient resolution.
//!
//! A registry is an immutable snapshot built from configuration. Callers share it
//! behind an `Arc`, so every validation or resolution sees one consistent table set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::MessagesConfig;
use crate::template::TemplateEngine;

#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    /// Trigger id -> description
    triggers: BTreeMap<String, String>,
    template_styles: BTreeSet<String>,
    /// Simple recipient token -> label
    recipient_labels: HashMap<String, String>,
    /// Parameterized token prefix -> label with `{name}` placeholder
    query_labels: HashMap<String, String>,
    template_engine: TemplateEngine,
}

impl MessageRegistry {
    pub fn from_config(config: &MessagesConfig) -> Self {
        Self {
            triggers: config
                .triggers
                .iter()
                .map(|t| (t.id.clone(), t.description.clone()))
                .collect(),
            template_styles: config.template_styles.iter().cloned().collect(),
            recipient_labels: config
                .recipients
                .iter()
                .map(|r| (r.token.clone(), r.label.clone()))
                .collect(),
            query_labels: config
                .query_recipients
                .iter()
                .map(|q| (q.prefix.clone(), q.label.clone()))
                .collect(),
            template_engine: TemplateEngine::new(config.examples.clone()),
        }
    }

    pub fn is_known_trigger(&self, trigger: &str) -> bool {
        self.triggers.contains_key(trigger)
    }

    /// Known triggers with their descriptions, sorted by id
    pub fn triggers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.triggers.iter().map(|(id, d)| (id.as_str(), d.as_str()))
    }

    pub fn is_known_template_style(&self, style: &str) -> bool {
        self.template_styles.contains(style)
    }

    pub fn template_styles(&self) -> impl Iterator<Item = &str> {
        self.template_styles.iter().map(String::as_str)
    }

    pub fn recipient_label(&self, token: &str) -> Option<&str> {
        self.recipient_labels.get(token).map(String::as_str)
    }

    pub fn query_label(&self, prefix: &str) -> Option<&str> {
        self.query_labels.get(prefix).map(String::as_str)
    }

    pub fn template_engine(&self) -> &TemplateEngine {
        &self.template_engine
    }
}
