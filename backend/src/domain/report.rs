//! Crime report aggregate: classification enums, the report code, and the
//! validated submission draft.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ids::{DepartmentId, ReportId, UserId};

/// Lifecycle status of a crime report.
///
/// The transition graph is deliberately free: investigative work may reopen
/// or redirect cases, so any status may follow any other. `Resolved` and
/// `Dismissed` are terminal by convention only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    /// Newly filed, awaiting triage.
    Pending,
    /// Actively being worked by the assigned department.
    Investigating,
    /// Closed with an outcome.
    Resolved,
    /// Closed without further action.
    Dismissed,
}

impl ReportStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Investigating,
        Self::Resolved,
        Self::Dismissed,
    ];

    /// Database/text representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Investigating => "Investigating",
            Self::Resolved => "Resolved",
            Self::Dismissed => "Dismissed",
        }
    }

    /// Parse the text representation produced by [`ReportStatus::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "Investigating" => Some(Self::Investigating),
            "Resolved" => Some(Self::Resolved),
            "Dismissed" => Some(Self::Dismissed),
            _ => None,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency classification selected by the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    /// No urgency.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// Needs prompt attention.
    High,
    /// Immediate danger to life or property.
    Emergency,
}

impl Priority {
    /// Database/text representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Emergency => "Emergency",
        }
    }

    /// Parse the text representation produced by [`Priority::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            "Emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    /// Physical assault.
    Assault,
    /// Breaking and entering.
    Burglary,
    /// Theft without force.
    Theft,
    /// Theft with force or threat.
    Robbery,
    /// Property damage.
    Vandalism,
    /// Deception for gain.
    Fraud,
    /// Online or computer-enabled crime.
    Cybercrime,
    /// Controlled substance offence.
    DrugOffense,
    /// Road traffic accident.
    TrafficAccident,
    /// Violence within a household.
    DomesticViolence,
    /// Harassment or stalking.
    Harassment,
    /// Anything not covered above.
    Other,
}

impl IncidentType {
    /// Database/text representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assault => "ASSAULT",
            Self::Burglary => "BURGLARY",
            Self::Theft => "THEFT",
            Self::Robbery => "ROBBERY",
            Self::Vandalism => "VANDALISM",
            Self::Fraud => "FRAUD",
            Self::Cybercrime => "CYBERCRIME",
            Self::DrugOffense => "DRUG_OFFENSE",
            Self::TrafficAccident => "TRAFFIC_ACCIDENT",
            Self::DomesticViolence => "DOMESTIC_VIOLENCE",
            Self::Harassment => "HARASSMENT",
            Self::Other => "OTHER",
        }
    }

    /// Parse the text representation produced by [`IncidentType::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ASSAULT" => Some(Self::Assault),
            "BURGLARY" => Some(Self::Burglary),
            "THEFT" => Some(Self::Theft),
            "ROBBERY" => Some(Self::Robbery),
            "VANDALISM" => Some(Self::Vandalism),
            "FRAUD" => Some(Self::Fraud),
            "CYBERCRIME" => Some(Self::Cybercrime),
            "DRUG_OFFENSE" => Some(Self::DrugOffense),
            "TRAFFIC_ACCIDENT" => Some(Self::TrafficAccident),
            "DOMESTIC_VIOLENCE" => Some(Self::DomesticViolence),
            "HARASSMENT" => Some(Self::Harassment),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`ReportCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCodeError;

impl fmt::Display for ReportCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report code must match CR- followed by 8 uppercase hex characters")
    }
}

impl std::error::Error for ReportCodeError {}

/// Human-transcribable report identity: `CR-` plus 8 uppercase hex chars.
///
/// ## Invariants
/// - globally unique (backed by a database constraint);
/// - assigned exactly once at creation, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "CR-4F9A01BC")]
pub struct ReportCode(String);

impl ReportCode {
    /// Generate a fresh code from a random UUID.
    ///
    /// Collisions are astronomically unlikely but not impossible; the
    /// lifecycle engine retries on the unique-constraint violation.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        let short: String = hex.chars().take(8).collect();
        Self(format!("CR-{short}"))
    }

    /// Validate an existing code, e.g. when loading from storage.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ReportCodeError> {
        let value = value.as_ref();
        let Some(suffix) = value.strip_prefix("CR-") else {
            return Err(ReportCodeError);
        };
        let valid = suffix.len() == 8
            && suffix
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase());
        if valid {
            Ok(Self(value.to_owned()))
        } else {
            Err(ReportCodeError)
        }
    }
}

impl AsRef<str> for ReportCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ReportCode> for String {
    fn from(value: ReportCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReportCode {
    type Error = ReportCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Validation errors returned by [`GeoPoint::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoPointError {
    /// Latitude outside [-90, 90].
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180].
    LongitudeOutOfRange,
}

impl fmt::Display for GeoPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange => write!(f, "latitude must be between -90 and 90"),
            Self::LongitudeOutOfRange => write!(f, "longitude must be between -180 and 180"),
        }
    }
}

impl std::error::Error for GeoPointError {}

/// GPS coordinates captured at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Degrees north of the equator.
    pub latitude: f64,
    /// Degrees east of the prime meridian.
    pub longitude: f64,
}

impl GeoPoint {
    /// Validate and construct coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoPointError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Stored evidence attachment paths, at most one per medium.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRefs {
    /// Photo evidence, relative to the media root.
    pub image: Option<String>,
    /// Video evidence, relative to the media root.
    pub video: Option<String>,
    /// Audio evidence, relative to the media root.
    pub audio: Option<String>,
}

impl EvidenceRefs {
    /// Number of attachments present.
    pub fn count(&self) -> usize {
        [&self.image, &self.video, &self.audio]
            .into_iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

/// Validation errors for report submission input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportValidationError {
    /// Title was empty once trimmed.
    EmptyTitle,
    /// Title exceeded the storage limit.
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Description was empty once trimmed.
    EmptyDescription,
    /// Location was empty once trimmed.
    EmptyLocation,
    /// Location exceeded the storage limit.
    LocationTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl fmt::Display for ReportValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyLocation => write!(f, "location must not be empty"),
            Self::LocationTooLong { max } => {
                write!(f, "location must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ReportValidationError {}

/// Maximum accepted title length.
pub const REPORT_TITLE_MAX: usize = 200;
/// Maximum accepted free-text location length.
pub const REPORT_LOCATION_MAX: usize = 255;

/// Validated report submission content, before routing is decided.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    /// Short summary shown in listings.
    pub title: String,
    /// Full incident description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Optional GPS coordinates.
    pub coordinates: Option<GeoPoint>,
    /// Incident classification.
    pub incident_type: IncidentType,
    /// Urgency classification.
    pub priority: Priority,
    /// Requested routing; officers have this overridden with their own
    /// department by the lifecycle engine.
    pub department: Option<DepartmentId>,
}

impl ReportDraft {
    /// Validate raw submission fields into a draft.
    pub fn try_new(
        title: &str,
        description: &str,
        location: &str,
        coordinates: Option<GeoPoint>,
        incident_type: IncidentType,
        priority: Priority,
        department: Option<DepartmentId>,
    ) -> Result<Self, ReportValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ReportValidationError::EmptyTitle);
        }
        if title.chars().count() > REPORT_TITLE_MAX {
            return Err(ReportValidationError::TitleTooLong {
                max: REPORT_TITLE_MAX,
            });
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ReportValidationError::EmptyDescription);
        }
        let location = location.trim();
        if location.is_empty() {
            return Err(ReportValidationError::EmptyLocation);
        }
        if location.chars().count() > REPORT_LOCATION_MAX {
            return Err(ReportValidationError::LocationTooLong {
                max: REPORT_LOCATION_MAX,
            });
        }
        Ok(Self {
            title: title.to_owned(),
            description: description.to_owned(),
            location: location.to_owned(),
            coordinates,
            incident_type,
            priority,
            department,
        })
    }
}

/// The crime report aggregate root.
///
/// ## Invariants
/// - `code` is globally unique and never reassigned;
/// - after creation the only mutations are status changes and department
///   reassignment; content fields are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrimeReport {
    /// Internal identifier.
    pub id: ReportId,
    /// Human-transcribable report code.
    pub code: ReportCode,
    /// Originating identity; `None` once the reporter account is removed.
    pub reporter: Option<UserId>,
    /// Routing target; `None` until assigned.
    pub department: Option<DepartmentId>,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Optional GPS coordinates.
    pub coordinates: Option<GeoPoint>,
    /// Incident classification.
    pub incident_type: IncidentType,
    /// Urgency classification.
    pub priority: Priority,
    /// Current lifecycle status.
    pub status: ReportStatus,
    /// Stored evidence attachments.
    pub evidence: EvidenceRefs,
    /// Submission timestamp, immutable.
    pub reported_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl CrimeReport {
    /// Build a fresh `Pending` report from a validated draft.
    pub fn from_draft(
        draft: ReportDraft,
        reporter: Option<UserId>,
        department: Option<DepartmentId>,
        evidence: EvidenceRefs,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReportId::random(),
            code: ReportCode::generate(),
            reporter,
            department,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            coordinates: draft.coordinates,
            incident_type: draft.incident_type,
            priority: draft.priority,
            status: ReportStatus::Pending,
            evidence,
            reported_at: now,
            updated_at: now,
        }
    }
}
