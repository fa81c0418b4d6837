//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types; no business logic resides here. Row structs (`models.rs`)
//! and schema definitions (`schema.rs`) are internal implementation details,
//! never exposed to the domain layer. Connections are pooled via `bb8` with
//! async execution through `diesel-async`.

pub(crate) mod diesel_error;
mod diesel_department_repository;
mod diesel_notification_repository;
mod diesel_officer_repository;
mod diesel_report_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_department_repository::DieselDepartmentRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_officer_repository::DieselOfficerRepository;
pub use diesel_report_repository::DieselReportRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{run_pending_migrations, MigrationError};
pub use pool::{DbPool, PoolConfig, PoolError};
