//! Patient entity - a portal account holder with exam records

use chrono::{DateTime, NaiveDate, Utc};

use crate::value_objects::Cpf;

/// Patient profile (credential columns live in `AccountCredentials`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
