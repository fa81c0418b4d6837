//! Port abstraction for notification persistence (both recipient tables).

use async_trait::async_trait;

use crate::domain::ids::{NotificationId, OfficerId, ReportId, UserId};
use crate::domain::notification::{
    CitizenNotification, CitizenNotificationKind, OfficerNotification,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

/// Write-side officer notification row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOfficerNotification {
    /// Recipient officer.
    pub officer: OfficerId,
    /// Free-text message.
    pub message: String,
}

/// Write-side citizen notification row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCitizenNotification {
    /// Recipient user.
    pub user: UserId,
    /// Category tag.
    pub kind: CitizenNotificationKind,
    /// Short headline.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Back-reference to the triggering report.
    pub report: Option<ReportId>,
}

/// Port for notification storage across both recipient tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist one row per entry; a fan-out event never deduplicates.
    async fn insert_officer_batch(
        &self,
        batch: &[NewOfficerNotification],
    ) -> Result<(), NotificationRepositoryError>;

    /// Persist a single citizen notification.
    async fn insert_citizen(
        &self,
        notification: &NewCitizenNotification,
    ) -> Result<(), NotificationRepositoryError>;

    /// List an officer's notifications, newest first.
    async fn list_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<Vec<OfficerNotification>, NotificationRepositoryError>;

    /// List a citizen's notifications, newest first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<CitizenNotification>, NotificationRepositoryError>;

    /// Unread tally for an officer's board badge.
    async fn unread_count_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Unread tally for a citizen's feed badge.
    async fn unread_count_for_user(
        &self,
        user: &UserId,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Fetch a citizen notification for the ownership check before marking
    /// it read.
    async fn find_citizen_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<CitizenNotification>, NotificationRepositoryError>;

    /// Mark one citizen notification read.
    async fn mark_citizen_read(
        &self,
        id: &NotificationId,
    ) -> Result<(), NotificationRepositoryError>;

    /// Mark all of an officer's unread notifications read; returns the
    /// number of rows changed.
    async fn mark_all_read_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<u64, NotificationRepositoryError>;

    /// Mark all of a citizen's unread notifications read; returns the
    /// number of rows changed.
    async fn mark_all_read_for_user(
        &self,
        user: &UserId,
    ) -> Result<u64, NotificationRepositoryError>;
}
