//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    LIFECYCLE_STAGES_TOTAL, MESSAGES_CREATED_TOTAL, MESSAGES_DELETED_TOTAL, MESSAGES_STORED,
    MESSAGES_UPDATED_TOTAL, RECIPIENT_LOOKUPS_TOTAL, RECIPIENT_UNKNOWN_TOTAL,
    TEMPLATE_RENDERS_TOTAL, VALIDATION_FAILURES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording message metrics
pub struct MessageMetrics;

impl MessageMetrics {
    /// Record a created message of the given kind
    pub fn record_created(kind: &str) {
        MESSAGES_CREATED_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn record_updated() {
        MESSAGES_UPDATED_TOTAL.inc();
    }

    pub fn record_deleted() {
        MESSAGES_DELETED_TOTAL.inc();
    }

    /// Set the number of stored messages
    pub fn set_stored(count: usize) {
        MESSAGES_STORED.set(count as i64);
    }

    /// Record a failed validation for one field
    pub fn record_validation_failure(field: &str) {
        VALIDATION_FAILURES_TOTAL.with_label_values(&[field]).inc();
    }
}

/// Helper struct for recording template metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    pub fn record_render(use_examples: bool) {
        let mode = if use_examples { "example" } else { "context" };
        TEMPLATE_RENDERS_TOTAL.with_label_values(&[mode]).inc();
    }
}

/// Helper struct for recording recipient resolution metrics
pub struct RecipientMetrics;

impl RecipientMetrics {
    pub fn record_lookup_found() {
        RECIPIENT_LOOKUPS_TOTAL.with_label_values(&["found"]).inc();
    }

    pub fn record_lookup_missing() {
        RECIPIENT_LOOKUPS_TOTAL.with_label_values(&["missing"]).inc();
    }

    pub fn record_lookup_failed() {
        RECIPIENT_LOOKUPS_TOTAL.with_label_values(&["error"]).inc();
    }

    pub fn record_unknown() {
        RECIPIENT_UNKNOWN_TOTAL.inc();
    }
}

/// Helper struct for recording lifecycle metrics
pub struct LifecycleMetrics;

impl LifecycleMetrics {
    /// Record a lifecycle stage being set on a message
    pub fn record_stage(stage: &str) {
        LIFECYCLE_STAGES_TOTAL.with_label_values(&[stage]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_recorded_metrics() {
        TemplateMetrics::record_render(true);
        RecipientMetrics::record_unknown();

        let output = encode_metrics().unwrap();
        assert!(output.contains("ara_messages_template_renders_total"));
        assert!(output.contains("ara_messages_recipient_unknown_total"));
    }
}
