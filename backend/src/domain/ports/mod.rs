//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod department_repository;
mod evidence_store;
mod notification_repository;
mod officer_repository;
mod report_repository;
mod user_repository;

pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use department_repository::{DepartmentRepository, DepartmentRepositoryError};
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use evidence_store::{EvidenceKind, EvidenceStore, EvidenceStoreError, EvidenceUpload};
#[cfg(test)]
pub use evidence_store::MockEvidenceStore;
pub use notification_repository::{
    NewCitizenNotification, NewOfficerNotification, NotificationRepository,
    NotificationRepositoryError,
};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use officer_repository::{OfficerRepository, OfficerRepositoryError};
#[cfg(test)]
pub use officer_repository::MockOfficerRepository;
pub use report_repository::{
    ReportRepository, ReportRepositoryError, ReportScope, StatusCounts,
};
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use user_repository::{
    NewUserRecord, StoredCredentials, UserRepository, UserRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
