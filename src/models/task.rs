use super::task_status::TaskStatus;
use crate::errors::AppError;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix marking a task id that was generated client-side and never saved.
pub const PLACEHOLDER_PREFIX: &str = "temp-";

static PLACEHOLDER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Identity of a task in an edited list: either a real row id or a
/// temporary placeholder that will be promoted on save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskId {
    Placeholder(String),
    Persisted(i64),
}

impl TaskId {
    /// New placeholder, unique within this process: `temp-<millis>-<seq>`.
    pub fn placeholder() -> Self {
        let seq = PLACEHOLDER_SEQ.fetch_add(1, Ordering::Relaxed);
        TaskId::Placeholder(format!(
            "{}{}-{}",
            PLACEHOLDER_PREFIX,
            Utc::now().timestamp_millis(),
            seq
        ))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TaskId::Placeholder(_))
    }

    pub fn persisted(&self) -> Option<i64> {
        match self {
            TaskId::Persisted(id) => Some(*id),
            TaskId::Placeholder(_) => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Placeholder(key) => f.write_str(key),
            TaskId::Persisted(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for TaskId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with(PLACEHOLDER_PREFIX) && s.len() > PLACEHOLDER_PREFIX.len() {
            return Ok(TaskId::Placeholder(s.to_string()));
        }
        s.parse::<i64>()
            .map(TaskId::Persisted)
            .map_err(|_| AppError::InvalidTaskId(s.to_string()))
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaskId::Placeholder(key) => serializer.serialize_str(key),
            TaskId::Persisted(id) => serializer.serialize_i64(*id),
        }
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Num(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Num(id) => Ok(TaskId::Persisted(id)),
            RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A persisted task row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub work_log_id: i64,
    pub user_id: i64,
    pub task_name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Placeholder id the task was created from, if any.
    pub client_key: Option<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Values for a task insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub work_log_id: i64,
    pub user_id: i64,
    pub task_name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub client_key: Option<String>,
}

/// Fields overwritten by a task update.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPatch {
    pub task_name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// When set, the update only applies if the stored version matches.
    pub expected_version: Option<i64>,
}

/// One entry of the client-side task list for a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedTask {
    pub id: TaskId,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl EditedTask {
    /// A fresh, unsaved task.
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            id: TaskId::placeholder(),
            task_name: task_name.into(),
            description: None,
            status: TaskStatus::Started,
            version: None,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.task_name.trim().is_empty()
    }

    /// An empty description is stored as NULL; anything else as typed.
    pub fn normalized_description(&self) -> Option<String> {
        self.description.as_ref().filter(|d| !d.is_empty()).cloned()
    }
}

impl From<&Task> for EditedTask {
    fn from(task: &Task) -> Self {
        Self {
            id: TaskId::Persisted(task.id),
            task_name: task.task_name.clone(),
            description: task.description.clone(),
            status: task.status,
            version: Some(task.version),
        }
    }
}
