//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Paths mirror the application's URL map: public auth routes, admin
//! oversight routes, department-scoped officer routes, and own-data
//! citizen routes. Session middleware is applied at the `App` level by the
//! server (and by tests), so [`register_routes`] only registers handlers.

pub mod admin;
pub mod auth;
pub mod citizen;
pub mod dto;
pub mod error;
pub mod health;
pub mod officer;
pub mod session;
pub mod state;

pub use error::ApiResult;
pub use state::AppState;

use actix_web::web;

/// Register every application route on the service config.
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // public
        .service(auth::register)
        .service(auth::my_login)
        .service(auth::logout)
        // admin
        .service(admin::dashboard)
        .service(admin::department_list)
        .service(admin::create_department)
        .service(admin::officer_list)
        .service(admin::provision_officer)
        .service(admin::reported_crime)
        .service(admin::crime_detail)
        .service(admin::update_report_status)
        .service(admin::search_crime)
        // officer
        .service(officer::officer_board)
        .service(officer::department_reports)
        .service(officer::add_report)
        .service(officer::report_detail)
        .service(officer::update_status)
        .service(officer::mark_notifications_read)
        .service(officer::search_report)
        // citizen
        .service(citizen::user_board)
        .service(citizen::own_reports)
        .service(citizen::submit_report)
        .service(citizen::report_detail)
        .service(citizen::notifications)
        .service(citizen::mark_notification_read)
        .service(citizen::mark_all_notifications_read);
}
