//! SQLite implementation of PatientRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::instrument;

use portal_core::entities::Patient;
use portal_core::error::DomainError;
use portal_core::traits::{NewPatient, PatientFilter, PatientRepository, RepoResult};
use portal_core::value_objects::Cpf;

use crate::models::PatientModel;

use super::error::{map_db_error, map_unique_violation, patient_not_found};

const PATIENT_COLUMNS: &str =
    "id, cpf, name, email, phone, birth_date, active, created_at, updated_at";

/// SQLite implementation of PatientRepository
#[derive(Clone)]
pub struct SqlitePatientRepository {
    pool: SqlitePool,
}

impl SqlitePatientRepository {
    /// Create a new SqlitePatientRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Append the filter conditions as bound parameters
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PatientFilter) {
    if let Some(name) = &filter.name {
        qb.push(" AND name LIKE ").push_bind(format!("%{name}%"));
    }
    if let Some(cpf) = &filter.cpf {
        qb.push(" AND cpf = ").push_bind(cpf.as_str().to_string());
    }
    if let Some(active) = filter.active {
        qb.push(" AND active = ").push_bind(active);
    }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepository {
    #[instrument(skip(self, patient, password_hash))]
    async fn create(&self, patient: &NewPatient, password_hash: &str) -> RepoResult<Patient> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO patients
                (cpf, name, email, phone, birth_date, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(patient.cpf.as_str())
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(patient.birth_date)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, |msg| {
                if msg.contains(".cpf") {
                    DomainError::DuplicateCpf
                } else {
                    DomainError::DuplicateEmail
                }
            })
        })?;

        Ok(Patient {
            id,
            cpf: patient.cpf.clone(),
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            birth_date: patient.birth_date,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Patient>> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?");

        let result = sqlx::query_as::<_, PatientModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(PatientModel::into_entity).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_cpf(&self, cpf: &Cpf) -> RepoResult<Option<Patient>> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE cpf = ?");

        let result = sqlx::query_as::<_, PatientModel>(&sql)
            .bind(cpf.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(PatientModel::into_entity).transpose()
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &PatientFilter) -> RepoResult<Vec<Patient>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE 1 = 1"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY name LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = qb
            .build_query_as::<PatientModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(PatientModel::into_entity).collect()
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &PatientFilter) -> RepoResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM patients WHERE 1 = 1");
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self, patient))]
    async fn update(&self, patient: &Patient) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE patients
            SET name = ?, email = ?, phone = ?, birth_date = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(patient.birth_date)
        .bind(Utc::now())
        .bind(patient.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::DuplicateEmail))?;

        if result.rows_affected() == 0 {
            return Err(patient_not_found(patient.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE patients SET active = 0, updated_at = ? WHERE id = ? AND active = 1
            ",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(patient_not_found(id));
        }

        Ok(())
    }
}
