//! Patient and admin profile models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use portal_core::entities::{Admin, Patient};
use portal_core::error::DomainError;
use portal_core::value_objects::Cpf;

use super::corrupt;

/// Database model for patients table (profile columns only)
#[derive(Debug, Clone, FromRow)]
pub struct PatientModel {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientModel {
    pub fn into_entity(self) -> Result<Patient, DomainError> {
        let cpf = Cpf::parse(&self.cpf).map_err(|e| corrupt("cpf", e))?;
        Ok(Patient {
            id: self.id,
            cpf,
            name: self.name,
            email: self.email,
            phone: self.phone,
            birth_date: self.birth_date,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database model for admins table (profile columns only)
#[derive(Debug, Clone, FromRow)]
pub struct AdminModel {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminModel {
    pub fn into_entity(self) -> Result<Admin, DomainError> {
        let cpf = Cpf::parse(&self.cpf).map_err(|e| corrupt("cpf", e))?;
        Ok(Admin {
            id: self.id,
            cpf,
            name: self.name,
            email: self.email,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
