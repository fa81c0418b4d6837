//! Access guard: the pure predicate gating every lifecycle call.
//!
//! Rules, in priority order:
//! 1. admins may perform every admin-tagged action, on any report;
//! 2. officers may perform officer-tagged actions, but report-scoped ones
//!    additionally require the target report to sit in their own department;
//! 3. citizens may perform citizen-tagged actions, and may only see reports
//!    they filed themselves.
//!
//! Every denial carries a user-visible message plus the landing route for
//! the actor's *actual* role — the uniform "redirect with message" failure
//! shape. Unauthenticated callers never reach this module; the session
//! layer rejects them first.

use serde_json::json;

use super::error::Error;
use super::identity::Identity;
use super::report::CrimeReport;

/// Guarded operations, tagged by the role(s) that may perform them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Admin: aggregate dashboard.
    ViewDashboard,
    /// Admin: list and create departments.
    ManageDepartments,
    /// Admin: provision officer accounts.
    ProvisionOfficers,
    /// Admin: list every report.
    ListAllReports,
    /// Admin: move a report to another department.
    ReassignDepartment,
    /// Officer: department-scoped board.
    ViewOfficerBoard,
    /// Officer: bulk-mark board notifications read.
    MarkOfficerNotificationsRead,
    /// Citizen: own-report board.
    ViewCitizenBoard,
    /// Citizen: own notification feed.
    ViewCitizenNotifications,
    /// Officer or citizen: file a new report.
    SubmitReport,
    /// Role-dependent: open a single report.
    ViewReport,
    /// Admin anywhere, officer within their department: change status.
    ChangeStatus,
    /// Admin globally, officer within their department: filter reports.
    SearchReports,
}

/// Rejection produced by the guard.
///
/// Carries the flash-style message and the landing route the actor should
/// be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    /// User-visible message.
    pub message: String,
    /// Landing route for the actor's actual role.
    pub landing: &'static str,
}

impl AccessDenied {
    fn new(message: impl Into<String>, identity: &Identity) -> Self {
        Self {
            message: message.into(),
            landing: identity.landing_route(),
        }
    }
}

impl From<AccessDenied> for Error {
    fn from(denied: AccessDenied) -> Self {
        Self::forbidden(denied.message).with_details(json!({ "redirectTo": denied.landing }))
    }
}

const NO_PERMISSION: &str = "You do not have permission to access this page.";
const OTHER_DEPARTMENT: &str = "This report belongs to another department.";
const NOT_YOUR_REPORT: &str = "You can only view your own reports.";

/// Decide whether `identity` may perform `action`, optionally against a
/// target report.
///
/// Report-scoped actions (`ViewReport`, `ChangeStatus`) expect
/// `target` to be present; without one they check only the role tag.
pub fn decide(
    identity: &Identity,
    action: Action,
    target: Option<&CrimeReport>,
) -> Result<(), AccessDenied> {
    match identity {
        Identity::Admin { .. } => match action {
            Action::ViewDashboard
            | Action::ManageDepartments
            | Action::ProvisionOfficers
            | Action::ListAllReports
            | Action::ReassignDepartment
            | Action::ViewReport
            | Action::ChangeStatus
            | Action::SearchReports => Ok(()),
            Action::ViewOfficerBoard
            | Action::MarkOfficerNotificationsRead
            | Action::ViewCitizenBoard
            | Action::ViewCitizenNotifications
            | Action::SubmitReport => Err(AccessDenied::new(NO_PERMISSION, identity)),
        },
        Identity::Officer { department, .. } => match action {
            Action::ViewOfficerBoard
            | Action::MarkOfficerNotificationsRead
            | Action::SubmitReport
            | Action::SearchReports => Ok(()),
            Action::ViewReport | Action::ChangeStatus => match target {
                Some(report) => {
                    if department.is_some() && report.department == *department {
                        Ok(())
                    } else {
                        Err(AccessDenied::new(OTHER_DEPARTMENT, identity))
                    }
                }
                None => Ok(()),
            },
            Action::ViewDashboard
            | Action::ManageDepartments
            | Action::ProvisionOfficers
            | Action::ListAllReports
            | Action::ReassignDepartment
            | Action::ViewCitizenBoard
            | Action::ViewCitizenNotifications => {
                Err(AccessDenied::new(NO_PERMISSION, identity))
            }
        },
        Identity::Citizen { user_id } => match action {
            Action::ViewCitizenBoard
            | Action::ViewCitizenNotifications
            | Action::SubmitReport => Ok(()),
            Action::ViewReport => match target {
                Some(report) if report.reporter == Some(*user_id) => Ok(()),
                Some(_) => Err(AccessDenied::new(NOT_YOUR_REPORT, identity)),
                None => Ok(()),
            },
            Action::ViewDashboard
            | Action::ManageDepartments
            | Action::ProvisionOfficers
            | Action::ListAllReports
            | Action::ReassignDepartment
            | Action::ViewOfficerBoard
            | Action::MarkOfficerNotificationsRead
            | Action::ChangeStatus
            | Action::SearchReports => Err(AccessDenied::new(NO_PERMISSION, identity)),
        },
    }
}

#[cfg(test)]
mod tests;
