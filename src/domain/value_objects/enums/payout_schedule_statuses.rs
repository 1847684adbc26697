use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PayoutScheduleStatus {
    Scheduled,
    Completed,
    Failed,
}

impl PayoutScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutScheduleStatus::Scheduled => "scheduled",
            PayoutScheduleStatus::Completed => "completed",
            PayoutScheduleStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(PayoutScheduleStatus::Scheduled),
            "completed" => Some(PayoutScheduleStatus::Completed),
            "failed" => Some(PayoutScheduleStatus::Failed),
            _ => None,
        }
    }
}

impl Display for PayoutScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
