//! Exam service
//!
//! Admins manage exam records; patients only ever see their own. The
//! ownership check lives here so every route goes through it.

use tracing::{info, instrument};

use portal_core::entities::{AccountRef, Exam, ExamStatus};
use portal_core::traits::{ExamFilter, NewExam};
use portal_core::value_objects::Role;
use portal_core::DomainError;

use crate::dto::{CreateExamRequest, ExamResponse, PaginatedResponse, UpdateExamRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Exam service
pub struct ExamService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExamService<'a> {
    /// Create a new ExamService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn parse_status(input: Option<&str>) -> ServiceResult<ExamStatus> {
        match input {
            None => Ok(ExamStatus::Pending),
            Some(s) => s
                .parse()
                .map_err(|_| ServiceError::validation(format!("Unknown exam status: {s}"))),
        }
    }

    async fn load_owned(&self, account: AccountRef, id: i64) -> ServiceResult<Exam> {
        let exam = self
            .ctx
            .exam_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ExamNotFound(id))?;

        if account.role == Role::Patient && exam.patient_id != account.id {
            return Err(DomainError::AccessDenied.into());
        }

        Ok(exam)
    }

    /// Create an exam record (admin)
    #[instrument(skip(self, request), fields(patient_id = request.patient_id))]
    pub async fn create(&self, request: CreateExamRequest) -> ServiceResult<ExamResponse> {
        // Referential checks up front so the caller gets a typed 404
        self.ctx
            .patient_repo()
            .find_by_id(request.patient_id)
            .await?
            .ok_or(DomainError::PatientNotFound(request.patient_id))?;

        if let Some(doctor_id) = request.doctor_id {
            self.ctx
                .doctor_repo()
                .find_by_id(doctor_id)
                .await?
                .ok_or(DomainError::DoctorNotFound(doctor_id))?;
        }

        let status = Self::parse_status(request.status.as_deref())?;

        let exam = self
            .ctx
            .exam_repo()
            .create(&NewExam {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                exam_type: request.exam_type,
                exam_date: request.exam_date,
                status,
                result: request.result,
                notes: request.notes,
            })
            .await?;

        info!(exam_id = exam.id, "Exam created");
        Ok(ExamResponse::from(&exam))
    }

    /// Get one exam; patients can only read their own
    #[instrument(skip(self))]
    pub async fn get(&self, account: AccountRef, id: i64) -> ServiceResult<ExamResponse> {
        let exam = self.load_owned(account, id).await?;
        Ok(ExamResponse::from(&exam))
    }

    /// List exams; patient callers are pinned to their own records
    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        account: AccountRef,
        mut filter: ExamFilter,
    ) -> ServiceResult<PaginatedResponse<ExamResponse>> {
        if account.role == Role::Patient {
            filter.patient_id = Some(account.id);
        }

        let total = self.ctx.exam_repo().count(&filter).await?;
        let exams = self.ctx.exam_repo().list(&filter).await?;

        let data = exams.iter().map(ExamResponse::from).collect();
        Ok(PaginatedResponse::new(data, total, filter.limit, filter.offset))
    }

    /// Update an exam record (admin)
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i64, request: UpdateExamRequest) -> ServiceResult<ExamResponse> {
        let mut exam = self
            .ctx
            .exam_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ExamNotFound(id))?;

        if let Some(doctor_id) = request.doctor_id {
            self.ctx
                .doctor_repo()
                .find_by_id(doctor_id)
                .await?
                .ok_or(DomainError::DoctorNotFound(doctor_id))?;
            exam.doctor_id = Some(doctor_id);
        }
        if let Some(exam_type) = request.exam_type {
            exam.exam_type = exam_type;
        }
        if let Some(exam_date) = request.exam_date {
            exam.exam_date = exam_date;
        }
        if let Some(status) = request.status.as_deref() {
            exam.status = Self::parse_status(Some(status))?;
        }
        if let Some(result) = request.result {
            exam.result = Some(result);
        }
        if let Some(notes) = request.notes {
            exam.notes = Some(notes);
        }

        self.ctx.exam_repo().update(&exam).await?;
        info!(exam_id = id, "Exam updated");

        let updated = self
            .ctx
            .exam_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ExamNotFound(id))?;
        Ok(ExamResponse::from(&updated))
    }

    /// Delete an exam record (admin)
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.ctx.exam_repo().delete(id).await?;
        info!(exam_id = id, "Exam deleted");
        Ok(())
    }
}
