//! Citizen endpoints: own-report board, report filing, and the citizen
//! notification feed.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CitizenNotification, CrimeReport, Error, NotificationId, ReportId};

use super::admin::StatusCountsDto;
use super::dto::NewReportRequest;
use super::officer::MarkReadResponse;
use super::session::{require_identity, SessionContext};
use super::state::AppState;
use super::ApiResult;

/// Citizen board payload: tallies over the caller's own reports.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CitizenBoardResponse {
    /// Tallies over the caller's own reports.
    pub counts: StatusCountsDto,
}

/// Citizen notification feed payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeedResponse {
    /// Unread notification count.
    pub unread: u64,
    /// Notifications, newest first.
    pub notifications: Vec<CitizenNotification>,
}

/// Own-report tallies.
#[utoipa::path(
    get,
    path = "/user-board",
    responses(
        (status = 200, description = "Citizen board", body = CitizenBoardResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a citizen", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "userBoard"
)]
#[get("/user-board")]
pub async fn user_board(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<CitizenBoardResponse>> {
    let identity = require_identity(&state, &session).await?;
    let counts = state.reports.citizen_board(&identity).await?;
    Ok(web::Json(CitizenBoardResponse {
        counts: counts.into(),
    }))
}

/// The caller's own reports, newest first.
#[utoipa::path(
    get,
    path = "/user-report",
    responses(
        (status = 200, description = "Own reports", body = [CrimeReport]),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a citizen", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "listOwnReports"
)]
#[get("/user-report")]
pub async fn own_reports(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CrimeReport>>> {
    let identity = require_identity(&state, &session).await?;
    let reports = state.reports.own_list(&identity).await?;
    Ok(web::Json(reports))
}

/// File a report as the logged-in citizen.
#[utoipa::path(
    post,
    path = "/user-report",
    request_body = NewReportRequest,
    responses(
        (status = 201, description = "Report filed", body = CrimeReport),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a citizen", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "userReport"
)]
#[post("/user-report")]
pub async fn submit_report(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: web::Json<NewReportRequest>,
) -> ApiResult<HttpResponse> {
    let identity = require_identity(&state, &session).await?;
    let (draft, uploads) = payload.into_inner().into_parts()?;
    let report = state.reports.create(&identity, draft, uploads).await?;
    Ok(HttpResponse::Created().json(report))
}

/// A single report the caller filed; foreign ids read as not found.
#[utoipa::path(
    get,
    path = "/c-report-detail/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report detail", body = CrimeReport),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown or foreign report", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "citizenReportDetail"
)]
#[get("/c-report-detail/{id}")]
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

/// The caller's notification feed.
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notification feed", body = NotificationFeedResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a citizen", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn notifications(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<NotificationFeedResponse>> {
    let identity = require_identity(&state, &session).await?;
    let feed = state.notifications.citizen_feed(&identity).await?;
    Ok(web::Json(NotificationFeedResponse {
        unread: feed.unread,
        notifications: feed.notifications,
    }))
}

/// Mark one of the caller's notifications read.
///
/// Foreign ids produce a structured `403` JSON body, not a redirect.
#[utoipa::path(
    post,
    path = "/mark-notification-read/{id}",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read", body = MarkReadResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Unknown notification", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "markNotificationRead"
)]
#[post("/mark-notification-read/{id}")]
pub async fn mark_notification_read(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<MarkReadResponse>> {
    let identity = require_identity(&state, &session).await?;
    let id = NotificationId::from_uuid(path.into_inner());
    state.notifications.mark_read(&identity, &id).await?;
    Ok(web::Json(MarkReadResponse { updated: 1 }))
}

/// Bulk-mark the caller's notifications read.
#[utoipa::path(
    post,
    path = "/mark-all-notifications-read",
    responses(
        (status = 200, description = "Notifications marked read", body = MarkReadResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a citizen", body = Error)
    ),
    tags = ["citizen"],
    operation_id = "markAllNotificationsRead"
)]
#[post("/mark-all-notifications-read")]
pub async fn mark_all_notifications_read(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkReadResponse>> {
    let identity = require_identity(&state, &session).await?;
    let updated = state
        .notifications
        .mark_all_read_for_citizen(&identity)
        .await?;
    Ok(web::Json(MarkReadResponse { updated }))
}
