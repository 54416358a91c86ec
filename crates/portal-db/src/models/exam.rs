//! Exam database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use portal_core::entities::{Exam, ExamStatus};
use portal_core::error::DomainError;

use super::corrupt;

/// Database model for exams table
#[derive(Debug, Clone, FromRow)]
pub struct ExamModel {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    pub exam_type: String,
    pub exam_date: NaiveDate,
    pub status: String,
    pub result: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExamModel {
    pub fn into_entity(self) -> Result<Exam, DomainError> {
        let status: ExamStatus = self.status.parse().map_err(|e| corrupt("status", e))?;
        Ok(Exam {
            id: self.id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            exam_type: self.exam_type,
            exam_date: self.exam_date,
            status,
            result: self.result,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
