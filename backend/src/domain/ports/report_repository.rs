//! Port abstraction for crime report persistence.

use async_trait::async_trait;

use crate::domain::ids::{DepartmentId, ReportId, UserId};
use crate::domain::report::{CrimeReport, ReportStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by report repository adapters.
    pub enum ReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "report repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "report repository query failed: {message}",
        /// The generated report code collided with an existing row.
        DuplicateCode { code: String } => "report code already exists: {code}",
    }
}

/// Visibility scope applied to report listings, searches, and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Every report (admin).
    All,
    /// Reports routed to one department (officer).
    Department(DepartmentId),
    /// Reports filed by one user (citizen).
    Reporter(UserId),
}

/// Per-status report tallies for the role boards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// All reports in scope.
    pub total: u64,
    /// Reports still pending triage.
    pub pending: u64,
    /// Reports under investigation.
    pub investigating: u64,
    /// Resolved reports.
    pub resolved: u64,
    /// Dismissed reports.
    pub dismissed: u64,
}

/// Port for crime report storage.
///
/// Mutations deliberately cover only the two post-creation changes the
/// lifecycle permits: status and department. Both writes are
/// last-writer-wins; there is no version column, so concurrent updates race
/// exactly as the stored model allows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist a new report.
    async fn insert(&self, report: &CrimeReport) -> Result<(), ReportRepositoryError>;

    /// Fetch a report by internal id.
    async fn find_by_id(&self, id: &ReportId) -> Result<Option<CrimeReport>, ReportRepositoryError>;

    /// List reports in scope, newest first.
    async fn list(&self, scope: &ReportScope) -> Result<Vec<CrimeReport>, ReportRepositoryError>;

    /// List the most recent reports in scope.
    async fn recent(
        &self,
        scope: &ReportScope,
        limit: u32,
    ) -> Result<Vec<CrimeReport>, ReportRepositoryError>;

    /// Case-insensitive substring filter over code, location, status, and
    /// incident type, newest first.
    async fn search(
        &self,
        scope: &ReportScope,
        query: &str,
    ) -> Result<Vec<CrimeReport>, ReportRepositoryError>;

    /// Tally reports in scope by status.
    async fn status_counts(
        &self,
        scope: &ReportScope,
    ) -> Result<StatusCounts, ReportRepositoryError>;

    /// Overwrite the status and refresh the update timestamp.
    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportRepositoryError>;

    /// Overwrite the department routing and refresh the update timestamp.
    async fn set_department(
        &self,
        id: &ReportId,
        department: &DepartmentId,
    ) -> Result<(), ReportRepositoryError>;
}
