//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage. Failures coming out of the
//! record store are classified into a `StoreError` first, so callers can
//! react to the kind of failure and show a readable message.

use rusqlite::ErrorCode;
use rusqlite::ffi;
use std::fmt;
use std::io;
use thiserror::Error;

/// Classification of a record store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Duplicate key, e.g. a second DailyLog for the same (user, date).
    UniquenessConflict,
    /// A reference points to a record that does not exist or belongs elsewhere.
    ReferentialIntegrity,
    /// The store could not be reached or read.
    Transport,
    /// The record changed since the caller read it.
    StaleWrite,
    Unclassified,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::UniquenessConflict => "uniqueness conflict",
            StoreErrorKind::ReferentialIntegrity => "referential integrity",
            StoreErrorKind::Transport => "transport failure",
            StoreErrorKind::StaleWrite => "stale write",
            StoreErrorKind::Unclassified => "store error",
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    /// The failing reference came from the caller's edit (a task or work
    /// log id that does not belong to the day), not from a missing user.
    pub edited_reference: bool,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            edited_reference: false,
        }
    }

    /// An edited id points at a record outside the day being saved.
    pub fn foreign_reference(message: impl Into<String>) -> Self {
        Self {
            edited_reference: true,
            ..Self::new(StoreErrorKind::ReferentialIntegrity, message)
        }
    }

    pub fn stale(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::StaleWrite, message)
    }

    /// Message meant for the person who triggered the operation.
    pub fn user_message(&self) -> String {
        match self.kind {
            StoreErrorKind::UniquenessConflict => "A record for this date already exists.".into(),
            StoreErrorKind::ReferentialIntegrity if self.edited_reference => {
                "Some of the edited tasks no longer belong to this day. Reload and try again."
                    .into()
            }
            StoreErrorKind::ReferentialIntegrity => {
                "Invalid user ID. Please refresh and try again.".into()
            }
            StoreErrorKind::Transport => {
                "Database unavailable. Check the database path and try again.".into()
            }
            StoreErrorKind::StaleWrite => {
                "This record was changed elsewhere. Reload and try again.".into()
            }
            StoreErrorKind::Unclassified => format!("Save failed: {}", self.message),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let kind = match &err {
            rusqlite::Error::SqliteFailure(e, _) => match e.code {
                ErrorCode::ConstraintViolation => match e.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        StoreErrorKind::UniquenessConflict
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreErrorKind::ReferentialIntegrity,
                    _ => StoreErrorKind::Unclassified,
                },
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
                | ErrorCode::NotADatabase => StoreErrorKind::Transport,
                _ => StoreErrorKind::Unclassified,
            },
            _ => StoreErrorKind::Unclassified,
        };

        StoreError::new(kind, err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("{}", .0.user_message())]
    Store(#[from] StoreError),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid period: {0} (use day, week, month, year or all)")]
    InvalidPeriod(String),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    #[error("Invalid task status: {0}")]
    InvalidStatus(String),

    #[error("Invalid task id: {0}")]
    InvalidTaskId(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Unknown user id {0}")]
    UnknownUser(i64),

    #[error("No users found. Add one with `rdaydone user add <NAME> <EMAIL>`")]
    NoUsers,

    #[error("Name and email are both required")]
    MissingUserField,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Store classification, when the failure came from the record store.
    pub fn store_kind(&self) -> Option<StoreErrorKind> {
        match self {
            AppError::Store(e) => Some(e.kind),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
