//! Admin entity - back-office account managing records

use chrono::{DateTime, Utc};

use crate::value_objects::Cpf;

/// Administrator profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: i64,
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
