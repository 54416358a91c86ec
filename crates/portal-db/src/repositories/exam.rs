//! SQLite implementation of ExamRepository
//!
//! Listing filters are assembled with `QueryBuilder` so every value is a
//! bound parameter, never interpolated into the SQL text.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::instrument;

use portal_core::entities::Exam;
use portal_core::traits::{ExamFilter, ExamRepository, NewExam, RepoResult};

use crate::models::ExamModel;

use super::error::{exam_not_found, map_db_error};

const EXAM_COLUMNS: &str =
    "id, patient_id, doctor_id, exam_type, exam_date, status, result, notes, created_at, updated_at";

/// SQLite implementation of ExamRepository
#[derive(Clone)]
pub struct SqliteExamRepository {
    pool: SqlitePool,
}

impl SqliteExamRepository {
    /// Create a new SqliteExamRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Append the filter conditions as bound parameters
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ExamFilter) {
    if let Some(patient_id) = filter.patient_id {
        qb.push(" AND patient_id = ").push_bind(patient_id);
    }
    if let Some(doctor_id) = filter.doctor_id {
        qb.push(" AND doctor_id = ").push_bind(doctor_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(exam_type) = &filter.exam_type {
        qb.push(" AND exam_type LIKE ").push_bind(format!("%{exam_type}%"));
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND exam_date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND exam_date <= ").push_bind(to);
    }
}

#[async_trait]
impl ExamRepository for SqliteExamRepository {
    #[instrument(skip(self, exam))]
    async fn create(&self, exam: &NewExam) -> RepoResult<Exam> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO exams
                (patient_id, doctor_id, exam_type, exam_date, status, result, notes,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(exam.patient_id)
        .bind(exam.doctor_id)
        .bind(&exam.exam_type)
        .bind(exam.exam_date)
        .bind(exam.status.as_str())
        .bind(&exam.result)
        .bind(&exam.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Exam {
            id,
            patient_id: exam.patient_id,
            doctor_id: exam.doctor_id,
            exam_type: exam.exam_type.clone(),
            exam_date: exam.exam_date,
            status: exam.status,
            result: exam.result.clone(),
            notes: exam.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Exam>> {
        let sql = format!("SELECT {EXAM_COLUMNS} FROM exams WHERE id = ?");

        let result = sqlx::query_as::<_, ExamModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(ExamModel::into_entity).transpose()
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &ExamFilter) -> RepoResult<Vec<Exam>> {
        let mut qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT {EXAM_COLUMNS} FROM exams WHERE 1 = 1"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY exam_date DESC, id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = qb
            .build_query_as::<ExamModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(ExamModel::into_entity).collect()
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &ExamFilter) -> RepoResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM exams WHERE 1 = 1");
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self, exam))]
    async fn update(&self, exam: &Exam) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE exams
            SET doctor_id = ?, exam_type = ?, exam_date = ?, status = ?, result = ?,
                notes = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(exam.doctor_id)
        .bind(&exam.exam_type)
        .bind(exam.exam_date)
        .bind(exam.status.as_str())
        .bind(&exam.result)
        .bind(&exam.notes)
        .bind(Utc::now())
        .bind(exam.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(exam_not_found(exam.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM exams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(exam_not_found(id));
        }

        Ok(())
    }
}
