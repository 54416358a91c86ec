//! Repository traits implemented by the persistence layer

mod repositories;

pub use repositories::{
    AccountRepository, AdminRepository, DoctorRepository, ExamFilter, ExamRepository, NewAdmin,
    NewDoctor, NewExam, NewPatient, PatientFilter, PatientRepository, RefreshTokenRepository,
    RepoResult, SecondFactorRepository, ShareRepository,
};
