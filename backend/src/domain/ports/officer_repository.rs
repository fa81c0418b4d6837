//! Port abstraction for officer profile persistence.

use async_trait::async_trait;

use crate::domain::ids::{DepartmentId, UserId};
use crate::domain::officer::Officer;
use crate::domain::user::User;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by officer repository adapters.
    pub enum OfficerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "officer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "officer repository query failed: {message}",
        /// Another officer already carries this badge number.
        DuplicateBadge { badge: String } => "badge number already issued: {badge}",
    }
}

/// Port for officer profile storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfficerRepository: Send + Sync {
    /// Persist a new officer profile.
    async fn insert(&self, officer: &Officer) -> Result<(), OfficerRepositoryError>;

    /// Fetch the profile owned by a user account, if any.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Officer>, OfficerRepositoryError>;

    /// List every profile together with its backing account, for the admin
    /// roster view.
    async fn list_with_users(&self) -> Result<Vec<(Officer, User)>, OfficerRepositoryError>;

    /// List the officers currently assigned to a department.
    ///
    /// Recomputed per fan-out call; expected department sizes are small.
    async fn list_by_department(
        &self,
        department: &DepartmentId,
    ) -> Result<Vec<Officer>, OfficerRepositoryError>;
}
