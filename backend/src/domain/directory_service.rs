//! Admin directory operations: departments and officer provisioning.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use zeroize::Zeroizing;

use super::access::{self, Action};
use super::department::{Department, NewDepartment};
use super::error::Error;
use super::identity::Identity;
use super::ids::{DepartmentId, OfficerId, UserId};
use super::officer::{BadgeNumber, Officer, Rank};
use super::ports::{
    CredentialHasher, CredentialHasherError, DepartmentRepository, DepartmentRepositoryError,
    NewUserRecord, OfficerRepository, OfficerRepositoryError, UserRepository, UserRepositoryError,
};
use super::user::{EmailAddress, Role, User};
use super::ApiResult;

/// Department with its current officer head-count, for the admin board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSummary {
    /// The department.
    pub department: Department,
    /// Officers currently assigned to it.
    pub officer_count: u64,
}

/// Officer profile joined with its backing account, for the admin roster.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficerProfile {
    /// The officer profile.
    pub officer: Officer,
    /// The backing user account.
    pub user: User,
}

/// Validated input for provisioning an officer account.
///
/// Provisioning creates the backing user (role `officer`) and the officer
/// profile in one action, mirroring the admin form.
#[derive(Debug, Clone)]
pub struct OfficerProvisioning {
    /// Given name, trimmed.
    pub first_name: String,
    /// Family name, trimmed.
    pub last_name: String,
    /// Login email for the new account.
    pub email: EmailAddress,
    /// Initial password, zeroised on drop.
    pub password: Zeroizing<String>,
    /// Rank to record.
    pub rank: Rank,
    /// Unique badge number.
    pub badge_number: BadgeNumber,
    /// Initial department assignment, if any.
    pub department: Option<DepartmentId>,
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::invalid_request("A user with this email already exists.")
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
        UserRepositoryError::DuplicatePhone { .. } => {
            Error::invalid_request("A user with this phone number already exists.")
                .with_details(json!({ "field": "phone", "code": "duplicate_phone" }))
        }
    }
}

fn map_officer_error(error: OfficerRepositoryError) -> Error {
    match error {
        OfficerRepositoryError::Connection { message } => Error::service_unavailable(message),
        OfficerRepositoryError::Query { message } => Error::internal(message),
        OfficerRepositoryError::DuplicateBadge { .. } => {
            Error::invalid_request("This badge number is already issued.")
                .with_details(json!({ "field": "badgeNumber", "code": "duplicate_badge" }))
        }
    }
}

fn map_department_error(error: DepartmentRepositoryError) -> Error {
    match error {
        DepartmentRepositoryError::Connection { message } => Error::service_unavailable(message),
        DepartmentRepositoryError::Query { message } => Error::internal(message),
        DepartmentRepositoryError::DuplicateName { .. } => {
            Error::invalid_request("A department with this name already exists.")
                .with_details(json!({ "field": "name", "code": "duplicate_name" }))
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Department management and officer provisioning.
#[derive(Clone)]
pub struct DirectoryService {
    users: Arc<dyn UserRepository>,
    officers: Arc<dyn OfficerRepository>,
    departments: Arc<dyn DepartmentRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl DirectoryService {
    /// Create the service over its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        officers: Arc<dyn OfficerRepository>,
        departments: Arc<dyn DepartmentRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            officers,
            departments,
            hasher,
        }
    }

    /// Create a department from validated input.
    pub async fn create_department(
        &self,
        identity: &Identity,
        request: NewDepartment,
    ) -> ApiResult<Department> {
        access::decide(identity, Action::ManageDepartments, None)?;
        let department = request.into_department();
        self.departments
            .insert(&department)
            .await
            .map_err(map_department_error)?;
        info!(name = %department.name, "department created");
        Ok(department)
    }

    /// Department board: the directory annotated with officer head-counts.
    pub async fn department_board(&self, identity: &Identity) -> ApiResult<Vec<DepartmentSummary>> {
        access::decide(identity, Action::ManageDepartments, None)?;
        let rows = self
            .departments
            .list_with_officer_counts()
            .await
            .map_err(map_department_error)?;
        Ok(rows
            .into_iter()
            .map(|(department, officer_count)| DepartmentSummary {
                department,
                officer_count,
            })
            .collect())
    }

    /// Plain department directory for the reassignment picker on the admin
    /// report detail view.
    pub async fn department_directory(&self, identity: &Identity) -> ApiResult<Vec<Department>> {
        access::decide(identity, Action::ReassignDepartment, None)?;
        self.departments.list().await.map_err(map_department_error)
    }

    /// Provision an officer: create the backing user account (role
    /// `officer`) and the profile.
    ///
    /// The two inserts are not transactional; a badge collision on the
    /// second leaves the user row behind, matching the form it replaces.
    pub async fn provision_officer(
        &self,
        identity: &Identity,
        provisioning: OfficerProvisioning,
    ) -> ApiResult<OfficerProfile> {
        access::decide(identity, Action::ProvisionOfficers, None)?;

        if let Some(id) = provisioning.department {
            if self
                .departments
                .find_by_id(&id)
                .await
                .map_err(map_department_error)?
                .is_none()
            {
                return Err(Error::invalid_request("Unknown department.")
                    .with_details(json!({ "field": "departmentId", "code": "unknown_department" })));
            }
        }

        let password_hash = self
            .hasher
            .hash(&provisioning.password)
            .map_err(map_hasher_error)?;
        let user = User {
            id: UserId::random(),
            email: provisioning.email,
            first_name: provisioning.first_name,
            last_name: provisioning.last_name,
            phone: None,
            address: None,
            role: Role::Officer,
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        self.users
            .insert(&NewUserRecord {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;

        let officer = Officer {
            id: OfficerId::random(),
            user_id: user.id,
            rank: provisioning.rank,
            badge_number: provisioning.badge_number,
            department: provisioning.department,
            on_duty: true,
        };
        self.officers
            .insert(&officer)
            .await
            .map_err(map_officer_error)?;
        info!(badge = %officer.badge_number, "officer provisioned");

        Ok(OfficerProfile { officer, user })
    }

    /// Full officer roster with backing accounts.
    pub async fn officer_roster(&self, identity: &Identity) -> ApiResult<Vec<OfficerProfile>> {
        access::decide(identity, Action::ProvisionOfficers, None)?;
        let rows = self
            .officers
            .list_with_users()
            .await
            .map_err(map_officer_error)?;
        Ok(rows
            .into_iter()
            .map(|(officer, user)| OfficerProfile { officer, user })
            .collect())
    }
}
