//! Report lifecycle engine: creation, status changes, and department
//! reassignment, each with its notification fan-out.
//!
//! Mutations are last-writer-wins on the report row. There is no version
//! column, so two concurrent status changes race: the second write
//! overwrites the first and both fan-outs run. That behaviour is inherited
//! from the stored model and kept as-is.
//!
//! Evidence files are written before the report row is inserted, so a
//! storage failure aborts creation; a database failure after the writes
//! leaves orphan files but never a row without its evidence.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use super::access::{self, Action};
use super::error::Error;
use super::identity::Identity;
use super::ids::{DepartmentId, ReportId};
use super::notification::CitizenNotificationKind;
use super::notification_service::NotificationService;
use super::ports::{
    DepartmentRepository, DepartmentRepositoryError, EvidenceStore, EvidenceStoreError,
    EvidenceUpload, ReportRepository, ReportRepositoryError, ReportScope, StatusCounts,
};
use super::report::{CrimeReport, EvidenceRefs, ReportCode, ReportDraft, ReportStatus};
use super::ApiResult;

/// Attempts at regenerating a colliding report code before giving up.
const CODE_RETRY_LIMIT: u32 = 3;

/// Name shown for reports that had no department before reassignment.
const UNASSIGNED: &str = "Unassigned";

/// Evidence uploads accompanying a submission, at most one per medium.
#[derive(Debug, Default)]
pub struct EvidenceUploads {
    /// Photo evidence.
    pub image: Option<EvidenceUpload>,
    /// Video evidence.
    pub video: Option<EvidenceUpload>,
    /// Audio evidence.
    pub audio: Option<EvidenceUpload>,
}

/// Outcome of a status change request.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    /// The report after the request.
    pub report: CrimeReport,
    /// False when the posted status equalled the current one; no
    /// notifications were produced in that case.
    pub changed: bool,
}

/// Outcome of a department reassignment request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reassignment {
    /// The report after the request.
    pub report: CrimeReport,
    /// False when the posted department equalled the current one.
    pub changed: bool,
}

/// Admin dashboard aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    /// Report tallies across every department.
    pub counts: StatusCounts,
    /// Total departments in the directory.
    pub departments: u64,
    /// Five most recent reports.
    pub recent: Vec<CrimeReport>,
}

fn map_report_error(error: ReportRepositoryError) -> Error {
    match error {
        ReportRepositoryError::Connection { message } => Error::service_unavailable(message),
        ReportRepositoryError::Query { message }
        | ReportRepositoryError::DuplicateCode { code: message } => Error::internal(message),
    }
}

fn map_department_error(error: DepartmentRepositoryError) -> Error {
    match error {
        DepartmentRepositoryError::Connection { message } => Error::service_unavailable(message),
        DepartmentRepositoryError::Query { message }
        | DepartmentRepositoryError::DuplicateName { name: message } => Error::internal(message),
    }
}

fn map_evidence_error(error: EvidenceStoreError) -> Error {
    match error {
        EvidenceStoreError::InvalidPayload { message } => Error::invalid_request(message),
        EvidenceStoreError::Unavailable { message } => Error::service_unavailable(message),
        EvidenceStoreError::Write { message } => Error::internal(message),
    }
}

fn unknown_department() -> Error {
    Error::invalid_request("Unknown department.")
        .with_details(json!({ "field": "departmentId", "code": "unknown_department" }))
}

/// The report lifecycle engine.
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    departments: Arc<dyn DepartmentRepository>,
    evidence: Arc<dyn EvidenceStore>,
    notifier: Arc<NotificationService>,
}

impl ReportService {
    /// Create the service over its ports and the fan-out service.
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        departments: Arc<dyn DepartmentRepository>,
        evidence: Arc<dyn EvidenceStore>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            reports,
            departments,
            evidence,
            notifier,
        }
    }

    /// File a new report.
    ///
    /// The caller becomes the reporter. When the caller is an officer the
    /// report is forced into the officer's own department, overriding any
    /// department in the draft. A department fan-out announces the new case.
    pub async fn create(
        &self,
        identity: &Identity,
        draft: ReportDraft,
        uploads: EvidenceUploads,
    ) -> ApiResult<CrimeReport> {
        access::decide(identity, Action::SubmitReport, None)?;

        let department = match identity {
            Identity::Officer { department, .. } => *department,
            Identity::Admin { .. } | Identity::Citizen { .. } => draft.department,
        };
        if let Some(id) = department {
            if self
                .departments
                .find_by_id(&id)
                .await
                .map_err(map_department_error)?
                .is_none()
            {
                return Err(unknown_department());
            }
        }

        let evidence = self.store_evidence(uploads).await?;
        let mut report = CrimeReport::from_draft(
            draft,
            Some(*identity.user_id()),
            department,
            evidence,
        );
        self.insert_with_fresh_code(&mut report).await?;
        info!(code = %report.code, "crime report filed");

        if report.department.is_some() {
            let message = format!("New crime reported: {} ({})", report.title, report.code);
            self.notifier
                .notify_department(report.department.as_ref(), &message, None)
                .await?;
        }
        Ok(report)
    }

    /// Change a report's status.
    ///
    /// Admins may change any report; officers only reports in their own
    /// department. Posting the current status is a successful no-op that
    /// produces zero notifications. An actual change notifies the reporter
    /// and the report's department, excluding the acting officer.
    pub async fn change_status(
        &self,
        identity: &Identity,
        id: &ReportId,
        new_status: ReportStatus,
    ) -> ApiResult<StatusChange> {
        let report = self.load(id).await?;
        access::decide(identity, Action::ChangeStatus, Some(&report))?;

        if report.status == new_status {
            return Ok(StatusChange {
                report,
                changed: false,
            });
        }

        self.reports
            .set_status(id, new_status)
            .await
            .map_err(map_report_error)?;
        let mut updated = report;
        updated.status = new_status;
        updated.updated_at = chrono::Utc::now();
        info!(code = %updated.code, status = %new_status, "report status changed");

        self.notifier
            .notify_reporter(
                &updated,
                CitizenNotificationKind::StatusUpdate,
                "Report Status Updated",
                &format!("Your report {} is now {}.", updated.code, new_status),
            )
            .await?;
        let exclude = match identity {
            Identity::Officer { officer_id, .. } => Some(officer_id),
            Identity::Admin { .. } | Identity::Citizen { .. } => None,
        };
        self.notifier
            .notify_department(
                updated.department.as_ref(),
                &format!("Report {} status changed to {}.", updated.code, new_status),
                exclude,
            )
            .await?;

        Ok(StatusChange {
            report: updated,
            changed: true,
        })
    }

    /// Move a report to another department. Admin only.
    ///
    /// Reassigning to the current department is a successful no-op. An
    /// actual move notifies the destination department and the reporter.
    pub async fn reassign_department(
        &self,
        identity: &Identity,
        id: &ReportId,
        new_department: DepartmentId,
    ) -> ApiResult<Reassignment> {
        let report = self.load(id).await?;
        access::decide(identity, Action::ReassignDepartment, Some(&report))?;

        let Some(destination) = self
            .departments
            .find_by_id(&new_department)
            .await
            .map_err(map_department_error)?
        else {
            return Err(unknown_department());
        };

        if report.department == Some(new_department) {
            return Ok(Reassignment {
                report,
                changed: false,
            });
        }

        let previous_name = match report.department {
            Some(old) => self
                .departments
                .find_by_id(&old)
                .await
                .map_err(map_department_error)?
                .map_or_else(|| UNASSIGNED.to_owned(), |d| d.name),
            None => UNASSIGNED.to_owned(),
        };

        self.reports
            .set_department(id, &new_department)
            .await
            .map_err(map_report_error)?;
        let mut updated = report;
        updated.department = Some(new_department);
        updated.updated_at = chrono::Utc::now();
        info!(
            code = %updated.code,
            from = %previous_name,
            to = %destination.name,
            "report reassigned"
        );

        self.notifier
            .notify_department(
                Some(&new_department),
                &format!("New case assigned: {} ({})", updated.title, updated.code),
                None,
            )
            .await?;
        self.notifier
            .notify_reporter(
                &updated,
                CitizenNotificationKind::Assignment,
                "Report Reassigned",
                &format!(
                    "Your report {} moved from {} to {}.",
                    updated.code, previous_name, destination.name
                ),
            )
            .await?;

        Ok(Reassignment {
            report: updated,
            changed: true,
        })
    }

    /// Open a single report, enforcing role visibility.
    ///
    /// Citizens probing foreign ids get `not_found` rather than a denial,
    /// so report existence leaks nothing; officers get the standard
    /// redirect-carrying denial.
    pub async fn detail(&self, identity: &Identity, id: &ReportId) -> ApiResult<CrimeReport> {
        let report = self.load(id).await?;
        match access::decide(identity, Action::ViewReport, Some(&report)) {
            Ok(()) => Ok(report),
            Err(denied) => match identity {
                Identity::Citizen { .. } => Err(Error::not_found("Report not found.")),
                Identity::Admin { .. } | Identity::Officer { .. } => Err(denied.into()),
            },
        }
    }

    /// Every report, newest first. Admin only.
    pub async fn list_all(&self, identity: &Identity) -> ApiResult<Vec<CrimeReport>> {
        access::decide(identity, Action::ListAllReports, None)?;
        self.reports
            .list(&ReportScope::All)
            .await
            .map_err(map_report_error)
    }

    /// Reports routed to the calling officer's department, newest first.
    /// An unassigned officer sees an empty listing.
    pub async fn department_list(&self, identity: &Identity) -> ApiResult<Vec<CrimeReport>> {
        access::decide(identity, Action::ViewOfficerBoard, None)?;
        let Identity::Officer {
            department: Some(department),
            ..
        } = identity
        else {
            return Ok(Vec::new());
        };
        self.reports
            .list(&ReportScope::Department(*department))
            .await
            .map_err(map_report_error)
    }

    /// Reports the calling citizen filed, newest first.
    pub async fn own_list(&self, identity: &Identity) -> ApiResult<Vec<CrimeReport>> {
        access::decide(identity, Action::ViewCitizenBoard, None)?;
        self.reports
            .list(&ReportScope::Reporter(*identity.user_id()))
            .await
            .map_err(map_report_error)
    }

    /// Filter visible reports by code, location, status, or incident type.
    /// A blank query returns the full scoped listing.
    pub async fn search(&self, identity: &Identity, query: &str) -> ApiResult<Vec<CrimeReport>> {
        access::decide(identity, Action::SearchReports, None)?;
        let scope = match identity {
            Identity::Admin { .. } => ReportScope::All,
            Identity::Officer { department, .. } => match department {
                Some(dept) => ReportScope::Department(*dept),
                None => return Ok(Vec::new()),
            },
            // The guard rejects citizens before this point.
            Identity::Citizen { user_id } => ReportScope::Reporter(*user_id),
        };
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.reports.list(&scope).await.map_err(map_report_error)
        } else {
            self.reports
                .search(&scope, trimmed)
                .await
                .map_err(map_report_error)
        }
    }

    /// Admin dashboard aggregates: global tallies, department count, and
    /// the five most recent reports.
    pub async fn dashboard(&self, identity: &Identity) -> ApiResult<AdminDashboard> {
        access::decide(identity, Action::ViewDashboard, None)?;
        let counts = self
            .reports
            .status_counts(&ReportScope::All)
            .await
            .map_err(map_report_error)?;
        let departments = self
            .departments
            .count()
            .await
            .map_err(map_department_error)?;
        let recent = self
            .reports
            .recent(&ReportScope::All, 5)
            .await
            .map_err(map_report_error)?;
        Ok(AdminDashboard {
            counts,
            departments,
            recent,
        })
    }

    /// Department-scoped tallies for the officer board. An unassigned
    /// officer sees zeroes.
    pub async fn officer_board(&self, identity: &Identity) -> ApiResult<StatusCounts> {
        access::decide(identity, Action::ViewOfficerBoard, None)?;
        let Identity::Officer {
            department: Some(department),
            ..
        } = identity
        else {
            return Ok(StatusCounts::default());
        };
        self.reports
            .status_counts(&ReportScope::Department(*department))
            .await
            .map_err(map_report_error)
    }

    /// Own-report tallies for the citizen board.
    pub async fn citizen_board(&self, identity: &Identity) -> ApiResult<StatusCounts> {
        access::decide(identity, Action::ViewCitizenBoard, None)?;
        self.reports
            .status_counts(&ReportScope::Reporter(*identity.user_id()))
            .await
            .map_err(map_report_error)
    }

    async fn load(&self, id: &ReportId) -> ApiResult<CrimeReport> {
        self.reports
            .find_by_id(id)
            .await
            .map_err(map_report_error)?
            .ok_or_else(|| Error::not_found("Report not found."))
    }

    async fn store_evidence(&self, uploads: EvidenceUploads) -> ApiResult<EvidenceRefs> {
        let mut refs = EvidenceRefs::default();
        if let Some(upload) = uploads.image {
            refs.image = Some(self.evidence.store(&upload).await.map_err(map_evidence_error)?);
        }
        if let Some(upload) = uploads.video {
            refs.video = Some(self.evidence.store(&upload).await.map_err(map_evidence_error)?);
        }
        if let Some(upload) = uploads.audio {
            refs.audio = Some(self.evidence.store(&upload).await.map_err(map_evidence_error)?);
        }
        Ok(refs)
    }

    async fn insert_with_fresh_code(&self, report: &mut CrimeReport) -> ApiResult<()> {
        let mut attempts = 0;
        loop {
            match self.reports.insert(report).await {
                Ok(()) => return Ok(()),
                Err(ReportRepositoryError::DuplicateCode { code })
                    if attempts < CODE_RETRY_LIMIT =>
                {
                    attempts += 1;
                    warn!(code = %code, attempts, "report code collision, regenerating");
                    report.code = ReportCode::generate();
                }
                Err(err) => return Err(map_report_error(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests;
