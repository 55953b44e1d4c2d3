//! Delivery lifecycle derived from timestamps.
//!
//! Status is never stored. It is classified from the message kind and which of
//! the three lifecycle timestamps are present; the values themselves and their
//! ordering are not inspected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::MessageKind;

/// Current delivery status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Editable, nothing recorded yet
    Drafted,
    Queued,
    Started,
    Delivered,
    /// Delivered automated message (it keeps firing on its trigger)
    Automated,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Drafted => "drafted",
            MessageStatus::Queued => "queued",
            MessageStatus::Started => "started",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Automated => "automated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MessageStatus::Delivered | MessageStatus::Automated)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle timestamp that the dispatcher records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Queued,
    Started,
    Delivered,
}

impl LifecycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Queued => "queued",
            LifecycleStage::Started => "started",
            LifecycleStage::Delivered => "delivered",
        }
    }
}

/// The three lifecycle timestamps of a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTimestamps {
    #[serde(default)]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl DeliveryTimestamps {
    pub fn is_queued(&self) -> bool {
        self.queued_at.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    /// True when no timestamp has been recorded
    pub fn is_blank(&self) -> bool {
        !self.is_queued() && !self.is_started() && !self.is_delivered()
    }

    pub fn get(&self, stage: LifecycleStage) -> Option<DateTime<Utc>> {
        match stage {
            LifecycleStage::Queued => self.queued_at,
            LifecycleStage::Started => self.started_at,
            LifecycleStage::Delivered => self.delivered_at,
        }
    }

    /// Record `stage` at `at`. Timestamps are set once and never cleared;
    /// returns false if the stage was already recorded.
    pub fn record(&mut self, stage: LifecycleStage, at: DateTime<Utc>) -> bool {
        let slot = match stage {
            LifecycleStage::Queued => &mut self.queued_at,
            LifecycleStage::Started => &mut self.started_at,
            LifecycleStage::Delivered => &mut self.delivered_at,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(at);
        true
    }
}

/// Classify the status of a message. First matching rule wins.
pub fn derive_status(kind: MessageKind, timestamps: &DeliveryTimestamps) -> MessageStatus {
    if timestamps.is_delivered() {
        if kind == MessageKind::Automated {
            MessageStatus::Automated
        } else {
            MessageStatus::Delivered
        }
    } else if timestamps.is_started() {
        MessageStatus::Started
    } else if timestamps.is_queued() {
        MessageStatus::Queued
    } else {
        MessageStatus::Drafted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn hour_ago() -> DateTime<Utc> {
        Utc::now() - Duration::hours(1)
    }

    fn timestamps(queued: bool, started: bool, delivered: bool) -> DeliveryTimestamps {
        DeliveryTimestamps {
            queued_at: queued.then(hour_ago),
            started_at: started.then(hour_ago),
            delivered_at: delivered.then(hour_ago),
        }
    }

    #[test]
    fn test_status_table() {
        let bulk = MessageKind::Bulk;
        assert_eq!(derive_status(bulk, &timestamps(false, false, false)), MessageStatus::Drafted);
        assert_eq!(derive_status(bulk, &timestamps(true, false, false)), MessageStatus::Queued);
        assert_eq!(derive_status(bulk, &timestamps(true, true, false)), MessageStatus::Started);
        assert_eq!(derive_status(bulk, &timestamps(true, true, true)), MessageStatus::Delivered);
        assert_eq!(
            derive_status(MessageKind::Automated, &timestamps(true, true, true)),
            MessageStatus::Automated
        );
    }

    #[test]
    fn test_status_tolerates_gaps() {
        // Delivered without started or queued still counts as delivered
        let only_delivered = timestamps(false, false, true);
        assert_eq!(derive_status(MessageKind::Bulk, &only_delivered), MessageStatus::Delivered);
        assert_eq!(
            derive_status(MessageKind::Automated, &only_delivered),
            MessageStatus::Automated
        );
        assert_eq!(
            derive_status(MessageKind::Bulk, &timestamps(false, true, false)),
            MessageStatus::Started
        );
    }

    #[test]
    fn test_automated_before_delivery() {
        let kind = MessageKind::Automated;
        assert_eq!(derive_status(kind, &timestamps(false, false, false)), MessageStatus::Drafted);
        assert_eq!(derive_status(kind, &timestamps(true, false, false)), MessageStatus::Queued);
        assert_eq!(derive_status(kind, &timestamps(true, true, false)), MessageStatus::Started);
    }

    #[test]
    fn test_predicates_are_independent() {
        let ts = timestamps(false, false, true);
        assert!(!ts.is_queued());
        assert!(!ts.is_started());
        assert!(ts.is_delivered());
        assert!(!ts.is_blank());
        assert!(DeliveryTimestamps::default().is_blank());
    }

    #[test]
    fn test_record_is_set_once() {
        let mut ts = DeliveryTimestamps::default();
        let first = hour_ago();
        assert!(ts.record(LifecycleStage::Queued, first));
        assert!(!ts.record(LifecycleStage::Queued, Utc::now()));
        assert_eq!(ts.get(LifecycleStage::Queued), Some(first));
        assert_eq!(ts.get(LifecycleStage::Started), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(MessageStatus::Delivered.is_terminal());
        assert!(MessageStatus::Automated.is_terminal());
        assert!(!MessageStatus::Started.is_terminal());
        assert_eq!(MessageStatus::Drafted.to_string(), "drafted");
    }
}
