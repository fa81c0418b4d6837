//! Domain entities, the access guard, and the lifecycle services.
//!
//! Purpose: keep the behavioural core — report lifecycle, notification
//! fan-out, and authorization — independent of HTTP and persistence.
//! Services talk to the outside world only through the traits in
//! [`ports`]; inbound adapters construct them over concrete adapters.

pub mod access;
pub mod auth_service;
pub mod department;
pub mod directory_service;
pub mod error;
pub mod identity;
pub mod ids;
pub mod notification;
pub mod notification_service;
pub mod officer;
pub mod ports;
pub mod report;
pub mod report_service;
pub mod user;

pub use self::access::{AccessDenied, Action};
pub use self::auth_service::{AuthService, CitizenRegistration, RegistrationValidationError};
pub use self::department::{Department, DepartmentValidationError, NewDepartment};
pub use self::directory_service::{
    DepartmentSummary, DirectoryService, OfficerProfile, OfficerProvisioning,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::Identity;
pub use self::ids::{DepartmentId, NotificationId, OfficerId, ReportId, UserId};
pub use self::notification::{
    CitizenNotification, CitizenNotificationKind, OfficerNotification,
};
pub use self::notification_service::{Feed, NotificationService};
pub use self::officer::{BadgeNumber, BadgeValidationError, Officer, Rank};
pub use self::report::{
    CrimeReport, EvidenceRefs, GeoPoint, GeoPointError, IncidentType, Priority, ReportCode,
    ReportDraft, ReportStatus, ReportValidationError,
};
pub use self::report_service::{
    AdminDashboard, EvidenceUploads, Reassignment, ReportService, StatusChange,
};
pub use self::user::{EmailAddress, EmailValidationError, Role, User};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
