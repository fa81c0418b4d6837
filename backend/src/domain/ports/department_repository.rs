//! Port abstraction for department directory persistence.

use async_trait::async_trait;

use crate::domain::department::Department;
use crate::domain::ids::DepartmentId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by department repository adapters.
    pub enum DepartmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "department repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "department repository query failed: {message}",
        /// Another department already uses this name.
        DuplicateName { name: String } => "department name already taken: {name}",
    }
}

/// Port for department directory storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Persist a new department.
    async fn insert(&self, department: &Department) -> Result<(), DepartmentRepositoryError>;

    /// Fetch a department by identifier.
    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError>;

    /// List the full directory, name-ordered.
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError>;

    /// List the directory annotated with current officer head-counts.
    async fn list_with_officer_counts(
        &self,
    ) -> Result<Vec<(Department, u64)>, DepartmentRepositoryError>;

    /// Total number of departments, for the admin dashboard.
    async fn count(&self) -> Result<u64, DepartmentRepositoryError>;
}
