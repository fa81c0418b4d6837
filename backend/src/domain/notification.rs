//! Notification records produced by the fan-out process.
//!
//! Two separate tables back these types: officers receive plain messages on
//! their board; citizens receive typed notifications optionally linked back
//! to the triggering report. Both are created only by the fan-out — the only
//! user-driven mutation is marking them read.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{NotificationId, OfficerId, ReportId, UserId};

/// Notification delivered to a single officer's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficerNotification {
    /// Stable identifier.
    pub id: NotificationId,
    /// Recipient officer; only they may mark it read.
    pub officer: OfficerId,
    /// Free-text message.
    pub message: String,
    /// Read flag, false on creation.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Category tag on citizen notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CitizenNotificationKind {
    /// The report's status changed.
    StatusUpdate,
    /// A follow-up nudge.
    Reminder,
    /// The report was routed to a (new) department.
    Assignment,
    /// Anything else.
    General,
}

impl CitizenNotificationKind {
    /// Database/text representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusUpdate => "status_update",
            Self::Reminder => "reminder",
            Self::Assignment => "assignment",
            Self::General => "general",
        }
    }

    /// Parse the text representation produced by
    /// [`CitizenNotificationKind::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "status_update" => Some(Self::StatusUpdate),
            "reminder" => Some(Self::Reminder),
            "assignment" => Some(Self::Assignment),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for CitizenNotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification delivered to the citizen who filed a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CitizenNotification {
    /// Stable identifier.
    pub id: NotificationId,
    /// Recipient user; only they may mark it read.
    pub user: UserId,
    /// Category tag.
    pub kind: CitizenNotificationKind,
    /// Short headline.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Back-reference to the triggering report, when one exists.
    pub report: Option<ReportId>,
    /// Read flag, false on creation.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CitizenNotificationKind::StatusUpdate, "status_update")]
    #[case(CitizenNotificationKind::Reminder, "reminder")]
    #[case(CitizenNotificationKind::Assignment, "assignment")]
    #[case(CitizenNotificationKind::General, "general")]
    fn kinds_round_trip_through_text(
        #[case] kind: CitizenNotificationKind,
        #[case] text: &str,
    ) {
        assert_eq!(kind.as_str(), text);
        assert_eq!(CitizenNotificationKind::parse(text), Some(kind));
    }

    #[test]
    fn unknown_kind_text_is_rejected() {
        assert_eq!(CitizenNotificationKind::parse("broadcast"), None);
    }
}
