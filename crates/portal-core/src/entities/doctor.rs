//! Doctor entity - requesting physician attached to exam records

use chrono::{DateTime, Utc};

/// Doctor record. Doctors do not log in; CRM is the medical council registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub crm: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
