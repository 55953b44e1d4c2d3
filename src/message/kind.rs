use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a message is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// One-off announcement sent to recipient groups (default)
    #[default]
    Bulk,
    /// Sent whenever its trigger fires
    Automated,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Bulk => "bulk",
            MessageKind::Automated => "automated",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names neither message kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown message type: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for MessageKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulk" => Ok(MessageKind::Bulk),
            "automated" => Ok(MessageKind::Automated),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}
