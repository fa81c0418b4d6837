//! Admin endpoints: dashboard, department management, officer provisioning,
//! report oversight, and cross-department lifecycle control.

use actix_web::{get, post, web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::StatusCounts;
use crate::domain::{
    BadgeNumber, CrimeReport, Department, DepartmentId, DepartmentValidationError, EmailAddress,
    Error, NewDepartment, OfficerId, OfficerProfile, OfficerProvisioning, Rank, ReportId,
    ReportStatus, UserId,
};

use super::dto::{field_error, SearchQuery};
use super::session::{require_identity, SessionContext};
use super::state::AppState;
use super::ApiResult;

/// Report tallies shown on the boards.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsDto {
    /// All reports in scope.
    pub total: u64,
    /// Pending reports.
    pub pending: u64,
    /// Reports under investigation.
    pub investigating: u64,
    /// Resolved reports.
    pub resolved: u64,
    /// Dismissed reports.
    pub dismissed: u64,
}

impl From<StatusCounts> for StatusCountsDto {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total,
            pending: counts.pending,
            investigating: counts.investigating,
            resolved: counts.resolved,
            dismissed: counts.dismissed,
        }
    }
}

/// Admin dashboard payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Global report tallies.
    pub counts: StatusCountsDto,
    /// Total departments in the directory.
    pub total_departments: u64,
    /// Five most recent reports.
    pub recent_reports: Vec<CrimeReport>,
}

/// Department with its officer head-count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummaryResponse {
    /// The department.
    pub department: Department,
    /// Officers currently assigned.
    pub officer_count: u64,
}

/// Department creation body for `POST /department`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRequest {
    /// Unique department name.
    pub name: String,
    /// Physical location.
    pub location: String,
    /// Front-desk contact number.
    #[serde(default)]
    pub contact_number: Option<String>,
    /// Establishment date.
    #[serde(default)]
    pub established_date: Option<NaiveDate>,
}

/// Officer roster entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficerResponse {
    /// Officer profile id.
    pub id: OfficerId,
    /// Backing account id.
    pub user_id: UserId,
    /// Officer's full name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Rank short code.
    pub rank: Rank,
    /// Badge number.
    pub badge_number: BadgeNumber,
    /// Current department.
    pub department_id: Option<DepartmentId>,
    /// On-duty flag.
    pub on_duty: bool,
}

impl From<OfficerProfile> for OfficerResponse {
    fn from(profile: OfficerProfile) -> Self {
        Self {
            id: profile.officer.id,
            user_id: profile.user.id,
            full_name: profile.user.full_name(),
            email: profile.user.email.to_string(),
            rank: profile.officer.rank,
            badge_number: profile.officer.badge_number,
            department_id: profile.officer.department,
            on_duty: profile.officer.on_duty,
        }
    }
}

/// Officer provisioning body for `POST /officer-list`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionOfficerRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email for the new account.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Rank short code, e.g. `DSP`.
    pub rank: String,
    /// Unique badge number.
    pub badge_number: String,
    /// Initial department assignment.
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

/// Report detail payload with the department picker directory.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrimeDetailResponse {
    /// The report.
    pub report: CrimeReport,
    /// Full department directory for reassignment.
    pub departments: Vec<Department>,
}

/// Status/department update body for `POST /update-report-status/{id}`.
///
/// Either field may be posted alone; posting neither is a validation
/// error. An empty status string is rejected rather than treated as "no
/// change".
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    /// New status, e.g. `Resolved`.
    #[serde(default)]
    pub status: Option<String>,
    /// New department routing.
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

fn map_department_validation(error: DepartmentValidationError) -> Error {
    let field = match &error {
        DepartmentValidationError::EmptyName | DepartmentValidationError::NameTooLong { .. } => {
            "name"
        }
        DepartmentValidationError::EmptyLocation => "location",
    };
    field_error(error.to_string(), field, "invalid")
}

/// Parse a posted status string, rejecting empty and unknown values.
pub(crate) fn parse_status(raw: &str) -> ApiResult<ReportStatus> {
    if raw.trim().is_empty() {
        return Err(field_error("Select a status.", "status", "empty_status"));
    }
    ReportStatus::parse(raw.trim()).ok_or_else(|| {
        field_error(format!("unknown status: {raw}"), "status", "unknown_status")
    })
}

/// Aggregate counts and recent reports.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = DashboardResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardResponse>> {
    let identity = require_identity(&state, &session).await?;
    let dashboard = state.reports.dashboard(&identity).await?;
    Ok(web::Json(DashboardResponse {
        counts: dashboard.counts.into(),
        total_departments: dashboard.departments,
        recent_reports: dashboard.recent,
    }))
}

/// Department directory with officer head-counts.
#[utoipa::path(
    get,
    path = "/department",
    responses(
        (status = 200, description = "Departments", body = [DepartmentSummaryResponse]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listDepartments"
)]
#[get("/department")]
pub async fn department_list(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DepartmentSummaryResponse>>> {
    let identity = require_identity(&state, &session).await?;
    let board = state.directory.department_board(&identity).await?;
    Ok(web::Json(
        board
            .into_iter()
            .map(|summary| DepartmentSummaryResponse {
                department: summary.department,
                officer_count: summary.officer_count,
            })
            .collect(),
    ))
}

/// Create a department.
#[utoipa::path(
    post,
    path = "/department",
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createDepartment"
)]
#[post("/department")]
pub async fn create_department(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: web::Json<DepartmentRequest>,
) -> ApiResult<HttpResponse> {
    let identity = require_identity(&state, &session).await?;
    let body = payload.into_inner();
    let request = NewDepartment::try_new(
        &body.name,
        &body.location,
        body.contact_number,
        body.established_date,
    )
    .map_err(map_department_validation)?;
    let department = state.directory.create_department(&identity, request).await?;
    Ok(HttpResponse::Created().json(department))
}

/// Officer roster.
#[utoipa::path(
    get,
    path = "/officer-list",
    responses(
        (status = 200, description = "Officers", body = [OfficerResponse]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listOfficers"
)]
#[get("/officer-list")]
pub async fn officer_list(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OfficerResponse>>> {
    let identity = require_identity(&state, &session).await?;
    let roster = state.directory.officer_roster(&identity).await?;
    Ok(web::Json(roster.into_iter().map(Into::into).collect()))
}

/// Provision an officer account (creates the backing user too).
#[utoipa::path(
    post,
    path = "/officer-list",
    request_body = ProvisionOfficerRequest,
    responses(
        (status = 201, description = "Officer provisioned", body = OfficerResponse),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "provisionOfficer"
)]
#[post("/officer-list")]
pub async fn provision_officer(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: web::Json<ProvisionOfficerRequest>,
) -> ApiResult<HttpResponse> {
    let identity = require_identity(&state, &session).await?;
    let body = payload.into_inner();
    let email = EmailAddress::new(&body.email)
        .map_err(|err| field_error(err.to_string(), "email", "invalid"))?;
    let rank = Rank::parse(&body.rank)
        .ok_or_else(|| field_error(format!("unknown rank: {}", body.rank), "rank", "unknown_rank"))?;
    let badge_number = BadgeNumber::new(&body.badge_number)
        .map_err(|err| field_error(err.to_string(), "badgeNumber", "invalid"))?;
    if body.password.chars().count() < crate::domain::auth_service::PASSWORD_MIN {
        return Err(field_error(
            "password must be at least 8 characters",
            "password",
            "too_short",
        ));
    }
    let first_name = body.first_name.trim();
    let last_name = body.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(field_error("names must not be empty", "firstName", "invalid"));
    }

    let provisioning = OfficerProvisioning {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email,
        password: zeroize::Zeroizing::new(body.password),
        rank,
        badge_number,
        department: body.department_id.map(DepartmentId::from_uuid),
    };
    let profile = state
        .directory
        .provision_officer(&identity, provisioning)
        .await?;
    Ok(HttpResponse::Created().json(OfficerResponse::from(profile)))
}

/// Every report, newest first.
#[utoipa::path(
    get,
    path = "/reported-crime",
    responses(
        (status = 200, description = "All reports", body = [CrimeReport]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listAllReports"
)]
#[get("/reported-crime")]
pub async fn reported_crime(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CrimeReport>>> {
    let identity = require_identity(&state, &session).await?;
    let reports = state.reports.list_all(&identity).await?;
    Ok(web::Json(reports))
}

/// Single report plus the department picker directory.
#[utoipa::path(
    get,
    path = "/crime-detail/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report detail", body = CrimeDetailResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown report", body = Error)
    ),
    tags = ["admin"],
    operation_id = "crimeDetail"
)]
#[get("/crime-detail/{id}")]
pub async fn crime_detail(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CrimeDetailResponse>> {
    let identity = require_identity(&state, &session).await?;
    let id = ReportId::from_uuid(path.into_inner());
    let report = state.reports.detail(&identity, &id).await?;
    let departments = state.directory.department_directory(&identity).await?;
    Ok(web::Json(CrimeDetailResponse {
        report,
        departments,
    }))
}

/// Change status and/or reassign department on a report.
#[utoipa::path(
    post,
    path = "/update-report-status/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Updated report", body = CrimeReport),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown report", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateReport"
)]
#[post("/update-report-status/{id}")]
pub async fn update_report_status(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateReportRequest>,
) -> ApiResult<web::Json<CrimeReport>> {
    let identity = require_identity(&state, &session).await?;
    let id = ReportId::from_uuid(path.into_inner());
    let body = payload.into_inner();

    let mut latest: Option<CrimeReport> = None;
    if let Some(department_id) = body.department_id {
        let outcome = state
            .reports
            .reassign_department(&identity, &id, DepartmentId::from_uuid(department_id))
            .await?;
        latest = Some(outcome.report);
    }
    if let Some(raw) = body.status.as_deref() {
        let status = parse_status(raw)?;
        let outcome = state.reports.change_status(&identity, &id, status).await?;
        latest = Some(outcome.report);
    }

    match latest {
        Some(report) => Ok(web::Json(report)),
        None => Err(field_error(
            "Nothing to update: post a status or a department.",
            "status",
            "empty_update",
        )),
    }
}

/// Filter reports by code, location, status, or incident type.
#[utoipa::path(
    get,
    path = "/search-crime",
    params(("q" = Option<String>, Query, description = "Filter text")),
    responses(
        (status = 200, description = "Matching reports", body = [CrimeReport]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "searchCrime"
)]
#[get("/search-crime")]
pub async fn search_crime(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<CrimeReport>>> {
    let identity = require_identity(&state, &session).await?;
    let reports = state
        .reports
        .search(&identity, query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(web::Json(reports))
}
