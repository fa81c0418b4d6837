//! Notification fan-out and recipient-facing feed operations.
//!
//! Fan-out creates one fresh row per affected recipient for every
//! triggering event; there is no deduplication. The "current department
//! officers" list is recomputed on every call rather than cached, which is
//! acceptable at expected department sizes.

use std::sync::Arc;

use tracing::debug;

use super::access::{self, Action};
use super::error::Error;
use super::identity::Identity;
use super::ids::{DepartmentId, NotificationId, OfficerId};
use super::notification::{CitizenNotification, CitizenNotificationKind, OfficerNotification};
use super::ports::{
    NewCitizenNotification, NewOfficerNotification, NotificationRepository,
    NotificationRepositoryError, OfficerRepository, OfficerRepositoryError,
};
use super::report::CrimeReport;
use super::ApiResult;

/// A recipient's notification feed with its unread badge count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed<T> {
    /// Unread notifications in the feed.
    pub unread: u64,
    /// Notifications, newest first.
    pub notifications: Vec<T>,
}

fn map_officer_error(error: OfficerRepositoryError) -> Error {
    match error {
        OfficerRepositoryError::Connection { message } => Error::service_unavailable(message),
        OfficerRepositoryError::Query { message }
        | OfficerRepositoryError::DuplicateBadge { badge: message } => Error::internal(message),
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => Error::service_unavailable(message),
        NotificationRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Fan-out plus feed reads and read-marking for both recipient kinds.
#[derive(Clone)]
pub struct NotificationService {
    officers: Arc<dyn OfficerRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Create the service over its ports.
    pub fn new(
        officers: Arc<dyn OfficerRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            officers,
            notifications,
        }
    }

    /// Create one notification per officer currently assigned to
    /// `department`, skipping `exclude` (the acting officer, on status
    /// changes). A report without a department is a logged no-op, not an
    /// error. Returns the number of rows created.
    pub async fn notify_department(
        &self,
        department: Option<&DepartmentId>,
        message: &str,
        exclude: Option<&OfficerId>,
    ) -> ApiResult<usize> {
        let Some(department) = department else {
            debug!("skipping department fan-out: no department assigned");
            return Ok(0);
        };
        let officers = self
            .officers
            .list_by_department(department)
            .await
            .map_err(map_officer_error)?;
        let batch: Vec<NewOfficerNotification> = officers
            .iter()
            .filter(|officer| Some(&officer.id) != exclude)
            .map(|officer| NewOfficerNotification {
                officer: officer.id,
                message: message.to_owned(),
            })
            .collect();
        if batch.is_empty() {
            return Ok(0);
        }
        self.notifications
            .insert_officer_batch(&batch)
            .await
            .map_err(map_notification_error)?;
        debug!(department = %department, count = batch.len(), "department fan-out delivered");
        Ok(batch.len())
    }

    /// Create a citizen notification for the report's originator. A report
    /// whose reporter has been removed is a no-op.
    pub async fn notify_reporter(
        &self,
        report: &CrimeReport,
        kind: CitizenNotificationKind,
        title: &str,
        message: &str,
    ) -> ApiResult<()> {
        let Some(user) = report.reporter else {
            debug!(report = %report.code, "skipping reporter notification: reporter absent");
            return Ok(());
        };
        self.notifications
            .insert_citizen(&NewCitizenNotification {
                user,
                kind,
                title: title.to_owned(),
                message: message.to_owned(),
                report: Some(report.id),
            })
            .await
            .map_err(map_notification_error)
    }

    /// Officer board feed: unread count plus notifications, newest first.
    pub async fn officer_feed(&self, identity: &Identity) -> ApiResult<Feed<OfficerNotification>> {
        access::decide(identity, Action::ViewOfficerBoard, None)?;
        let officer_id = Self::officer_id_of(identity)?;
        let unread = self
            .notifications
            .unread_count_for_officer(&officer_id)
            .await
            .map_err(map_notification_error)?;
        let notifications = self
            .notifications
            .list_for_officer(&officer_id)
            .await
            .map_err(map_notification_error)?;
        Ok(Feed {
            unread,
            notifications,
        })
    }

    /// Citizen notification feed: unread count plus notifications, newest
    /// first.
    pub async fn citizen_feed(&self, identity: &Identity) -> ApiResult<Feed<CitizenNotification>> {
        access::decide(identity, Action::ViewCitizenNotifications, None)?;
        let user_id = *identity.user_id();
        let unread = self
            .notifications
            .unread_count_for_user(&user_id)
            .await
            .map_err(map_notification_error)?;
        let notifications = self
            .notifications
            .list_for_user(&user_id)
            .await
            .map_err(map_notification_error)?;
        Ok(Feed {
            unread,
            notifications,
        })
    }

    /// Mark a single citizen notification read. Only the owner may do so;
    /// foreign ids produce a structured `forbidden` error rather than a
    /// redirect.
    pub async fn mark_read(&self, identity: &Identity, id: &NotificationId) -> ApiResult<()> {
        access::decide(identity, Action::ViewCitizenNotifications, None)?;
        let Some(notification) = self
            .notifications
            .find_citizen_by_id(id)
            .await
            .map_err(map_notification_error)?
        else {
            return Err(Error::not_found("Notification not found."));
        };
        if notification.user != *identity.user_id() {
            return Err(Error::forbidden(
                "You may only manage your own notifications.",
            ));
        }
        self.notifications
            .mark_citizen_read(id)
            .await
            .map_err(map_notification_error)
    }

    /// Bulk-mark the calling officer's notifications read; returns the
    /// number of rows changed. Other officers' rows are untouched.
    pub async fn mark_all_read_for_officer(&self, identity: &Identity) -> ApiResult<u64> {
        access::decide(identity, Action::MarkOfficerNotificationsRead, None)?;
        let officer_id = Self::officer_id_of(identity)?;
        self.notifications
            .mark_all_read_for_officer(&officer_id)
            .await
            .map_err(map_notification_error)
    }

    /// Bulk-mark the calling citizen's notifications read; returns the
    /// number of rows changed.
    pub async fn mark_all_read_for_citizen(&self, identity: &Identity) -> ApiResult<u64> {
        access::decide(identity, Action::ViewCitizenNotifications, None)?;
        self.notifications
            .mark_all_read_for_user(identity.user_id())
            .await
            .map_err(map_notification_error)
    }

    /// Extract the officer profile id; the guard has already confirmed the
    /// role, so any other variant is a logic error.
    fn officer_id_of(identity: &Identity) -> ApiResult<OfficerId> {
        match identity {
            Identity::Officer { officer_id, .. } => Ok(*officer_id),
            Identity::Admin { .. } | Identity::Citizen { .. } => Err(Error::internal(
                "officer action authorised for a non-officer identity",
            )),
        }
    }
}
