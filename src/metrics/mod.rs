//! Prometheus metrics for the message service.
//!
//! This module provides metrics for monitoring the message engine:
//! - Message metrics (created, updated, deleted)
//! - Validation failures by field
//! - Template renders by mode (real values vs. examples)
//! - Recipient lookups by outcome
//! - Lifecycle stages recorded

mod helpers;

pub use helpers::{encode_metrics, LifecycleMetrics, MessageMetrics, RecipientMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter, IntCounterVec,
    IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara_messages";

lazy_static! {
    // ============================================================================
    // Message Metrics
    // ============================================================================

    /// Total messages created
    pub static ref MESSAGES_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_created_total", METRIC_PREFIX),
        "Total messages created",
        &["kind"]
    ).unwrap();

    /// Total message content updates
    pub static ref MESSAGES_UPDATED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_updated_total", METRIC_PREFIX),
        "Total message content updates"
    ).unwrap();

    /// Total messages deleted
    pub static ref MESSAGES_DELETED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_deleted_total", METRIC_PREFIX),
        "Total messages deleted"
    ).unwrap();

    /// Messages currently stored
    pub static ref MESSAGES_STORED: IntGauge = register_int_gauge!(
        format!("{}_stored", METRIC_PREFIX),
        "Number of messages currently stored"
    ).unwrap();

    /// Validation failures by field
    pub static ref VALIDATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_validation_failures_total", METRIC_PREFIX),
        "Total field validation failures",
        &["field"]
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Template renders by mode
    pub static ref TEMPLATE_RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_renders_total", METRIC_PREFIX),
        "Total template renders",
        &["mode"]
    ).unwrap();

    // ============================================================================
    // Recipient Metrics
    // ============================================================================

    /// Parameterized recipient lookups by outcome
    pub static ref RECIPIENT_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_recipient_lookups_total", METRIC_PREFIX),
        "Total parameterized recipient lookups",
        &["outcome"]
    ).unwrap();

    /// Recipient tokens that resolved to "(unknown)"
    pub static ref RECIPIENT_UNKNOWN_TOTAL: IntCounter = register_int_counter!(
        format!("{}_recipient_unknown_total", METRIC_PREFIX),
        "Total recipient tokens resolved as unknown"
    ).unwrap();

    // ============================================================================
    // Lifecycle Metrics
    // ============================================================================

    /// Lifecycle stages recorded by stage
    pub static ref LIFECYCLE_STAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_lifecycle_stages_total", METRIC_PREFIX),
        "Total lifecycle stages recorded",
        &["stage"]
    ).unwrap();
}
