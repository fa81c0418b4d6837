//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! ever talk to domain services, never to adapters directly.

use std::sync::Arc;

use crate::domain::{AuthService, DirectoryService, NotificationService, ReportService};

/// Domain services injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, and identity resolution.
    pub auth: Arc<AuthService>,
    /// Department management and officer provisioning.
    pub directory: Arc<DirectoryService>,
    /// Report lifecycle engine.
    pub reports: Arc<ReportService>,
    /// Notification fan-out and feeds.
    pub notifications: Arc<NotificationService>,
}

impl AppState {
    /// Bundle the services for injection.
    pub fn new(
        auth: Arc<AuthService>,
        directory: Arc<DirectoryService>,
        reports: Arc<ReportService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            auth,
            directory,
            reports,
            notifications,
        }
    }
}
