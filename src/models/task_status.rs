use serde::{Deserialize, Serialize};

/// Closed set of task states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Started,
    #[serde(rename = "In Progress")]
    InProgress,
    Finished,
    Pending,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl TaskStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaskStatus::Started => "Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Finished => "Finished",
            TaskStatus::Pending => "Pending",
            TaskStatus::OnHold => "On Hold",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Started" => Some(TaskStatus::Started),
            "In Progress" => Some(TaskStatus::InProgress),
            "Finished" => Some(TaskStatus::Finished),
            "Pending" => Some(TaskStatus::Pending),
            "On Hold" => Some(TaskStatus::OnHold),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Finished)
    }
}
