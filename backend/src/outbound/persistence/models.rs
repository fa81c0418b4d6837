//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    citizen_notifications, crime_reports, departments, officer_notifications, officers, users,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub role: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the departments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub contact_number: Option<String>,
    pub established_date: Option<NaiveDate>,
    pub is_active: bool,
}

/// Insertable struct for creating new department records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
pub(crate) struct NewDepartmentRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub location: &'a str,
    pub contact_number: Option<&'a str>,
    pub established_date: Option<NaiveDate>,
    pub is_active: bool,
}

/// Row struct for reading from the officers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = officers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OfficerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rank: String,
    pub badge_number: String,
    pub department_id: Option<Uuid>,
    pub on_duty: bool,
}

/// Insertable struct for creating new officer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = officers)]
pub(crate) struct NewOfficerRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rank: &'a str,
    pub badge_number: &'a str,
    pub department_id: Option<Uuid>,
    pub on_duty: bool,
}

/// Row struct for reading from the crime_reports table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crime_reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CrimeReportRow {
    pub id: Uuid,
    pub code: String,
    pub reporter_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub incident_type: String,
    pub priority: String,
    pub status: String,
    pub evidence_image: Option<String>,
    pub evidence_video: Option<String>,
    pub evidence_audio: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new crime report records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crime_reports)]
pub(crate) struct NewCrimeReportRow<'a> {
    pub id: Uuid,
    pub code: &'a str,
    pub reporter_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub incident_type: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub evidence_image: Option<&'a str>,
    pub evidence_video: Option<&'a str>,
    pub evidence_audio: Option<&'a str>,
    pub reported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the officer_notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = officer_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OfficerNotificationRow {
    pub id: Uuid,
    pub officer_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating officer notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = officer_notifications)]
pub(crate) struct NewOfficerNotificationRow<'a> {
    pub id: Uuid,
    pub officer_id: Uuid,
    pub message: &'a str,
    pub is_read: bool,
}

/// Row struct for reading from the citizen_notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = citizen_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CitizenNotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub report_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating citizen notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = citizen_notifications)]
pub(crate) struct NewCitizenNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub report_id: Option<Uuid>,
    pub is_read: bool,
}
