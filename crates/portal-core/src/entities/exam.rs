//! Exam entity - a medical exam record belonging to one patient

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an exam record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    Pending,
    InProgress,
    Completed,
}

impl ExamStatus {
    /// Stable string form persisted in the `status` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamStatus {
    type Err = UnknownExamStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownExamStatus(other.to_string())),
        }
    }
}

/// Error for unrecognized status strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown exam status: {0}")]
pub struct UnknownExamStatus(pub String);

/// Medical exam record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    pub exam_type: String,
    pub exam_date: NaiveDate,
    pub status: ExamStatus,
    pub result: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
