//! Officer endpoints: department-scoped board, report filing, status
//! updates, and board notifications.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CrimeReport, Error, OfficerNotification, ReportId};

use super::admin::{parse_status, StatusCountsDto};
use super::dto::{NewReportRequest, SearchQuery};
use super::session::{require_identity, SessionContext};
use super::state::AppState;
use super::ApiResult;

/// How many notifications ride along on the board payload.
const BOARD_NOTIFICATION_LIMIT: usize = 5;

/// Officer board payload: department-scoped tallies plus the notification
/// badge and its most recent entries.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficerBoardResponse {
    /// Tallies for the officer's department.
    pub counts: StatusCountsDto,
    /// Unread notification count.
    pub unread_notifications: u64,
    /// Most recent notifications, newest first.
    pub recent_notifications: Vec<OfficerNotification>,
}

/// Status update body for `POST /update-status/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// New status, e.g. `Investigating`.
    pub status: String,
}

/// Bulk mark-read outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    /// Number of notifications flipped to read.
    pub updated: u64,
}

/// Department-scoped counts and recent notifications.
#[utoipa::path(
    get,
    path = "/officer-board",
    responses(
        (status = 200, description = "Officer board", body = OfficerBoardResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an officer", body = Error)
    ),
    tags = ["officer"],
    operation_id = "officerBoard"
)]
#[get("/officer-board")]
pub async fn officer_board(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<OfficerBoardResponse>> {
    let identity = require_identity(&state, &session).await?;
    let counts = state.reports.officer_board(&identity).await?;
    let feed = state.notifications.officer_feed(&identity).await?;
    let mut recent = feed.notifications;
    recent.truncate(BOARD_NOTIFICATION_LIMIT);
    Ok(web::Json(OfficerBoardResponse {
        counts: counts.into(),
        unread_notifications: feed.unread,
        recent_notifications: recent,
    }))
}

/// Reports routed to the officer's department, newest first.
#[utoipa::path(
    get,
    path = "/add-report",
    responses(
        (status = 200, description = "Department reports", body = [CrimeReport]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an officer", body = Error)
    ),
    tags = ["officer"],
    operation_id = "listDepartmentReports"
)]
#[get("/add-report")]
pub async fn department_reports(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CrimeReport>>> {
    let identity = require_identity(&state, &session).await?;
    let reports = state.reports.department_list(&identity).await?;
    Ok(web::Json(reports))
}

/// File a report; the officer's own department overrides any posted one.
#[utoipa::path(
    post,
    path = "/add-report",
    request_body = NewReportRequest,
    responses(
        (status = 201, description = "Report filed", body = CrimeReport),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an officer", body = Error)
    ),
    tags = ["officer"],
    operation_id = "officerAddReport"
)]
#[post("/add-report")]
pub async fn add_report(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: web::Json<NewReportRequest>,
) -> ApiResult<HttpResponse> {
    let identity = require_identity(&state, &session).await?;
    let (draft, uploads) = payload.into_inner().into_parts()?;
    let report = state.reports.create(&identity, draft, uploads).await?;
    Ok(HttpResponse::Created().json(report))
}

/// Single report, department-matched.
#[utoipa::path(
    get,
    path = "/report-detail/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report detail", body = CrimeReport),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Another department's report", body = Error),
        (status = 404, description = "Unknown report", body = Error)
    ),
    tags = ["officer"],
    operation_id = "reportDetail"
)]
#[get("/report-detail/{id}")]
pub async fn report_detail(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CrimeReport>> {
    let identity = require_identity(&state, &session).await?;
    let id = ReportId::from_uuid(path.into_inner());
    let report = state.reports.detail(&identity, &id).await?;
    Ok(web::Json(report))
}

/// Change a report's status within the officer's own department.
#[utoipa::path(
    post,
    path = "/update-status/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated report", body = CrimeReport),
        (status = 400, description = "Invalid status", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Another department's report", body = Error),
        (status = 404, description = "Unknown report", body = Error)
    ),
    tags = ["officer"],
    operation_id = "updateStatus"
)]
#[post("/update-status/{id}")]
pub async fn update_status(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<CrimeReport>> {
    let identity = require_identity(&state, &session).await?;
    let id = ReportId::from_uuid(path.into_inner());
    let status = parse_status(&payload.status)?;
    let outcome = state.reports.change_status(&identity, &id, status).await?;
    Ok(web::Json(outcome.report))
}

/// Bulk-mark the officer's notifications read.
#[utoipa::path(
    post,
    path = "/mark-notifications-read",
    responses(
        (status = 200, description = "Notifications marked read", body = MarkReadResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an officer", body = Error)
    ),
    tags = ["officer"],
    operation_id = "markNotificationsRead"
)]
#[post("/mark-notifications-read")]
pub async fn mark_notifications_read(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkReadResponse>> {
    let identity = require_identity(&state, &session).await?;
    let updated = state
        .notifications
        .mark_all_read_for_officer(&identity)
        .await?;
    Ok(web::Json(MarkReadResponse { updated }))
}

/// Department-scoped report filter.
#[utoipa::path(
    get,
    path = "/search-report",
    params(("q" = Option<String>, Query, description = "Filter text")),
    responses(
        (status = 200, description = "Matching reports", body = [CrimeReport]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not an officer", body = Error)
    ),
    tags = ["officer"],
    operation_id = "searchReport"
)]
#[get("/search-report")]
pub async fn search_report(
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
