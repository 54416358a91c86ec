//! List query extractors
//!
//! Turn query strings into the repository filter types, with the limit
//! clamped and typed fields (CPF, status, dates) parsed up front so the
//! handler only ever sees a well-formed filter.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::NaiveDate;
use portal_core::entities::ExamStatus;
use portal_core::traits::{ExamFilter, PatientFilter};
use portal_core::value_objects::Cpf;
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
const DEFAULT_LIMIT: i64 = 50;
/// Maximum page size
const MAX_LIMIT: i64 = 100;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Raw patient list query parameters
#[derive(Debug, Deserialize)]
pub struct PatientListParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Validated patient list filter
#[derive(Debug, Clone)]
pub struct PatientListQuery(pub PatientFilter);

impl TryFrom<PatientListParams> for PatientListQuery {
    type Error = ApiError;

    fn try_from(params: PatientListParams) -> Result<Self, Self::Error> {
        let cpf = params
            .cpf
            .map(|s| Cpf::parse(&s).map_err(|e| ApiError::invalid_query(e.to_string())))
            .transpose()?;

        Ok(Self(PatientFilter {
            name: params.name,
            cpf,
            active: params.active,
            limit: clamp_limit(params.limit),
            offset: clamp_offset(params.offset),
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PatientListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PatientListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Self::try_from(params)
    }
}

/// Raw exam list query parameters
#[derive(Debug, Deserialize)]
pub struct ExamListParams {
    #[serde(default, rename = "patientId")]
    pub patient_id: Option<i64>,
    #[serde(default, rename = "doctorId")]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "examType")]
    pub exam_type: Option<String>,
    #[serde(default, rename = "dateFrom")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, rename = "dateTo")]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Validated exam list filter
#[derive(Debug, Clone)]
pub struct ExamListQuery(pub ExamFilter);

impl TryFrom<ExamListParams> for ExamListQuery {
    type Error = ApiError;

    fn try_from(params: ExamListParams) -> Result<Self, Self::Error> {
        let status = params
            .status
            .map(|s| {
                s.parse::<ExamStatus>()
                    .map_err(|_| ApiError::invalid_query(format!("Unknown exam status: {s}")))
            })
            .transpose()?;

        Ok(Self(ExamFilter {
            patient_id: params.patient_id,
            doctor_id: params.doctor_id,
            status,
            exam_type: params.exam_type,
            date_from: params.date_from,
            date_to: params.date_to,
            limit: clamp_limit(params.limit),
            offset: clamp_offset(params.offset),
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ExamListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ExamListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Self::try_from(params)
    }
}
