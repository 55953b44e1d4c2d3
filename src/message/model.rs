//! The message aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recipients::RecipientResolver;
use crate::template::{TemplateContext, TemplateEngine};

use super::kind::MessageKind;
use super::lifecycle::{derive_status, DeliveryTimestamps, MessageStatus};
use super::registry::MessageRegistry;
use super::validation::{ValidationErrors, BLANK, NOT_INCLUDED};

/// Name of the built-in template style
pub const DEFAULT_TEMPLATE_STYLE: &str = "default";

/// An outbound message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: Uuid,

    /// Bulk or automated
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Named layout the message is rendered in
    #[serde(rename = "template")]
    pub template_style: String,

    /// Internal name shown to admins
    pub name: String,

    /// Subject line, may contain {{variable}} placeholders
    pub subject: String,

    /// Body text, may contain {{variable}} placeholders
    pub body: String,

    /// Event that fires an automated message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    /// Recipient tokens of a bulk message
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Lifecycle timestamps recorded by the dispatcher
    #[serde(flatten)]
    pub delivery: DeliveryTimestamps,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new message, as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDraft {
    /// "bulk" (default) or "automated"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Template style (defaults to "default")
    #[serde(default, rename = "template")]
    pub template_style: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub trigger: Option<String>,

    #[serde(default)]
    pub recipients: Vec<String>,
}

/// Content changes to an existing message. Absent fields are left alone;
/// a blank trigger clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageChanges {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default, rename = "template")]
    pub template_style: Option<String>,

    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub trigger: Option<String>,
    pub recipients: Option<Vec<String>>,
}

fn parse_kind(value: &str, errors: &mut ValidationErrors) -> Option<MessageKind> {
    match value.trim().parse::<MessageKind>() {
        Ok(kind) => Some(kind),
        Err(_) => {
            errors.add("type", NOT_INCLUDED);
            None
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

impl Message {
    /// Build a drafted message, normalizing then validating every field.
    pub fn from_draft(
        draft: MessageDraft,
        registry: &MessageRegistry,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kind = match draft.kind.as_deref() {
            Some(value) => parse_kind(value, &mut errors).unwrap_or_default(),
            None => MessageKind::default(),
        };

        let mut message = Message {
            id: Uuid::new_v4(),
            kind,
            template_style: draft
                .template_style
                .unwrap_or_else(|| DEFAULT_TEMPLATE_STYLE.to_string()),
            name: draft.name,
            subject: draft.subject,
            body: draft.body,
            trigger: draft.trigger,
            recipients: draft.recipients,
            delivery: DeliveryTimestamps::default(),
            created_at: now,
            updated_at: now,
        };
        message.normalize();

        if let Err(e) = message.validate(registry) {
            errors.extend(e);
        }
        errors.into_result().map(|_| message)
    }

    /// Apply content changes. Nothing is modified unless the result is valid.
    pub fn apply_changes(
        &mut self,
        changes: MessageChanges,
        registry: &MessageRegistry,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut candidate = self.clone();

        if let Some(value) = changes.kind.as_deref() {
            if let Some(kind) = parse_kind(value, &mut errors) {
                candidate.kind = kind;
            }
        }
        if let Some(template_style) = changes.template_style {
            candidate.template_style = template_style;
        }
        if let Some(name) = changes.name {
            candidate.name = name;
        }
        if let Some(subject) = changes.subject {
            candidate.subject = subject;
        }
        if let Some(body) = changes.body {
            candidate.body = body;
        }
        if let Some(trigger) = changes.trigger {
            candidate.trigger = Some(trigger);
        }
        if let Some(recipients) = changes.recipients {
            candidate.recipients = recipients;
        }

        candidate.normalize();
        if let Err(e) = candidate.validate(registry) {
            errors.extend(e);
        }
        errors.into_result()?;

        candidate.updated_at = now;
        *self = candidate;
        Ok(())
    }

    /// Trim text fields, drop blank recipient tokens and a blank trigger.
    /// Automated messages carry no recipient tokens.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.template_style);
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.subject);
        trim_in_place(&mut self.body);

        self.trigger = self
            .trigger
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if self.is_automated() {
            self.recipients.clear();
        } else {
            self.recipients = std::mem::take(&mut self.recipients)
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
        }
    }

    /// Check every field rule, collecting all failures.
    pub fn validate(&self, registry: &MessageRegistry) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [
            ("name", &self.name),
            ("subject", &self.subject),
            ("template", &self.template_style),
            ("body", &self.body),
        ] {
            if value.is_empty() {
                errors.add(field, BLANK);
            }
        }

        if !self.template_style.is_empty()
            && !registry.is_known_template_style(&self.template_style)
        {
            errors.add("template", NOT_INCLUDED);
        }

        let engine = registry.template_engine();
        for (field, text) in [("subject", &self.subject), ("body", &self.body)] {
            if let Err(e) = engine.validate(text) {
                errors.add(field, e.to_string());
            }
        }

        if let Some(trigger) = &self.trigger {
            if !registry.is_known_trigger(trigger) {
                errors.add("trigger", NOT_INCLUDED);
            }
        }

        errors.into_result()
    }

    pub fn is_bulk(&self) -> bool {
        self.kind == MessageKind::Bulk
    }

    pub fn is_automated(&self) -> bool {
        self.kind == MessageKind::Automated
    }

    pub fn using_default_template(&self) -> bool {
        self.template_style == DEFAULT_TEMPLATE_STYLE
    }

    pub fn is_queued(&self) -> bool {
        self.delivery.is_queued()
    }

    pub fn is_started(&self) -> bool {
        self.delivery.is_started()
    }

    pub fn is_delivered(&self) -> bool {
        self.delivery.is_delivered()
    }

    pub fn status(&self) -> MessageStatus {
        derive_status(self.kind, &self.delivery)
    }

    /// Content may only change while nothing has been queued, started or delivered.
    pub fn can_edit(&self) -> bool {
        self.delivery.is_blank()
    }

    pub fn parsed_body(
        &self,
        engine: &TemplateEngine,
        context: &TemplateContext,
        use_examples: bool,
    ) -> String {
        engine.render(&self.body, context, use_examples)
    }

    pub fn parsed_subject(
        &self,
        engine: &TemplateEngine,
        context: &TemplateContext,
        use_examples: bool,
    ) -> String {
        engine.render(&self.subject, context, use_examples)
    }

    /// Human-readable labels for the recipient tokens
    pub async fn recipients_list(&self, resolver: &RecipientResolver) -> Vec<String> {
        resolver.resolve(&self.recipients).await
    }
}
