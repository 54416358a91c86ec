//! Doctor database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use portal_core::entities::Doctor;

/// Database model for doctors table
#[derive(Debug, Clone, FromRow)]
pub struct DoctorModel {
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

impl From<DoctorModel> for Doctor {
    fn from(m: DoctorModel) -> Self {
        Self {
            id: m.id,
            name: m.name,
            crm: m.crm,
            specialty: m.specialty,
            email: m.email,
            phone: m.phone,
            active: m.active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
