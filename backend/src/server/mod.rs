//! Server construction: session key handling and service wiring.

mod config;

pub use config::AppConfig;

use std::sync::Arc;

use actix_web::cookie::Key;
use tracing::warn;

use crate::domain::{
    AuthService, DirectoryService, NotificationService, ReportService,
};
use crate::inbound::http::AppState;
use crate::outbound::evidence::FsEvidenceStore;
use crate::outbound::persistence::{
    DbPool, DieselDepartmentRepository, DieselNotificationRepository, DieselOfficerRepository,
    DieselReportRepository, DieselUserRepository, PoolConfig,
};
use crate::outbound::security::Argon2CredentialHasher;

/// Load the session signing key, generating an ephemeral one in debug
/// builds (or when `SESSION_ALLOW_EPHEMERAL=1`) so local development works
/// without a mounted secret.
pub fn load_session_key(config: &AppConfig) -> std::io::Result<Key> {
    match std::fs::read(&config.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(err) => {
            let allow_dev =
                std::env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(
                    path = %config.session_key_file,
                    error = %err,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {err}",
                    config.session_key_file
                )))
            }
        }
    }
}

/// Wire the domain services over their production adapters.
pub async fn build_state(config: &AppConfig) -> std::io::Result<AppState> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let officers = Arc::new(DieselOfficerRepository::new(pool.clone()));
    let departments = Arc::new(DieselDepartmentRepository::new(pool.clone()));
    let reports = Arc::new(DieselReportRepository::new(pool.clone()));
    let notifications = Arc::new(DieselNotificationRepository::new(pool));
    let evidence = Arc::new(
        FsEvidenceStore::open(&config.media_root)
            .map_err(|err| std::io::Error::other(err.to_string()))?,
    );
    let hasher = Arc::new(Argon2CredentialHasher);

    let notifier = Arc::new(NotificationService::new(
        officers.clone(),
        notifications.clone(),
    ));
    let auth = Arc::new(AuthService::new(
        users.clone(),
        officers.clone(),
        hasher.clone(),
    ));
    let directory = Arc::new(DirectoryService::new(
        users,
        officers,
        departments.clone(),
        hasher,
    ));
    let report_service = Arc::new(ReportService::new(
        reports,
        departments,
        evidence,
        notifier.clone(),
    ));

    Ok(AppState::new(auth, directory, report_service, notifier))
}
