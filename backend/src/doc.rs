//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every endpoint from the inbound layer, the shared
//! schemas, and the session-cookie security scheme. Swagger UI serves the
//! document at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain;
use crate::inbound::http::{admin, auth, citizen, dto, officer};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /my-login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Crime reporting backend API",
        description = "Role-based crime reporting: citizens file reports, \
            officers triage department-scoped cases, admins reassign and resolve."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        auth::register,
        auth::my_login,
        auth::logout,
        admin::dashboard,
        admin::department_list,
        admin::create_department,
        admin::officer_list,
        admin::provision_officer,
        admin::reported_crime,
        admin::crime_detail,
        admin::update_report_status,
        admin::search_crime,
        officer::officer_board,
        officer::department_reports,
        officer::add_report,
        officer::report_detail,
        officer::update_status,
        officer::mark_notifications_read,
        officer::search_report,
        citizen::user_board,
        citizen::own_reports,
        citizen::submit_report,
        citizen::report_detail,
        citizen::notifications,
        citizen::mark_notification_read,
        citizen::mark_all_notifications_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        domain::Error,
        domain::ErrorCode,
        domain::UserId,
        domain::OfficerId,
        domain::DepartmentId,
        domain::ReportId,
        domain::NotificationId,
        domain::ReportCode,
        domain::BadgeNumber,
        domain::CrimeReport,
        domain::GeoPoint,
        domain::EvidenceRefs,
        domain::ReportStatus,
        domain::Priority,
        domain::IncidentType,
        domain::Department,
        domain::Rank,
        domain::OfficerNotification,
        domain::CitizenNotification,
        domain::CitizenNotificationKind,
        dto::NewReportRequest,
        dto::EvidencePayload,
        auth::RegisterRequest,
        auth::RegisterResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        admin::StatusCountsDto,
        admin::DashboardResponse,
        admin::DepartmentSummaryResponse,
        admin::DepartmentRequest,
        admin::OfficerResponse,
        admin::ProvisionOfficerRequest,
        admin::CrimeDetailResponse,
        admin::UpdateReportRequest,
        officer::OfficerBoardResponse,
        officer::UpdateStatusRequest,
        officer::MarkReadResponse,
        citizen::CitizenBoardResponse,
        citizen::NotificationFeedResponse,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "admin", description = "Administrative oversight"),
        (name = "officer", description = "Department-scoped officer operations"),
        (name = "citizen", description = "Citizen self-service"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
