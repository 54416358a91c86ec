//! SQLite implementation of DoctorRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use portal_core::entities::Doctor;
use portal_core::error::DomainError;
use portal_core::traits::{DoctorRepository, NewDoctor, RepoResult};

use crate::models::DoctorModel;

use super::error::{doctor_not_found, map_db_error, map_unique_violation};

const DOCTOR_COLUMNS: &str =
    "id, name, crm, specialty, email, phone, active, created_at, updated_at";

/// SQLite implementation of DoctorRepository
#[derive(Clone)]
pub struct SqliteDoctorRepository {
    pool: SqlitePool,
}

impl SqliteDoctorRepository {
    /// Create a new SqliteDoctorRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for SqliteDoctorRepository {
    #[instrument(skip(self, doctor))]
    async fn create(&self, doctor: &NewDoctor) -> RepoResult<Doctor> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO doctors (name, crm, specialty, email, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(&doctor.name)
        .bind(&doctor.crm)
        .bind(&doctor.specialty)
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::DuplicateCrm))?;

        Ok(Doctor {
            id,
            name: doctor.name.clone(),
            crm: doctor.crm.clone(),
            specialty: doctor.specialty.clone(),
            email: doctor.email.clone(),
            phone: doctor.phone.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Doctor>> {
        let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?");

        let result = sqlx::query_as::<_, DoctorModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Doctor::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, active_only: bool) -> RepoResult<Vec<Doctor>> {
        let sql = if active_only {
            format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE active = 1 ORDER BY name")
        } else {
            format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY name")
        };

        let rows = sqlx::query_as::<_, DoctorModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    #[instrument(skip(self, doctor))]
    async fn update(&self, doctor: &Doctor) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE doctors
            SET name = ?, crm = ?, specialty = ?, email = ?, phone = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&doctor.name)
        .bind(&doctor.crm)
        .bind(&doctor.specialty)
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(Utc::now())
        .bind(doctor.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::DuplicateCrm))?;

        if result.rows_affected() == 0 {
            return Err(doctor_not_found(doctor.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE doctors SET active = 0, updated_at = ? WHERE id = ? AND active = 1
            ",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(doctor_not_found(id));
        }

        Ok(())
    }
}
