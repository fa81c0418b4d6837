//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate with `diesel print-schema` after migration
//! changes.

diesel::table! {
    /// User accounts, shared by admins, officers, and citizens.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email.
        email -> Varchar,
        /// Argon2 PHC-format credential hash.
        password_hash -> Varchar,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
        /// Contact number; unique when present.
        phone -> Nullable<Varchar>,
        /// Postal address.
        address -> Nullable<Text>,
        /// Role tag: admin, officer, or citizen.
        role -> Varchar,
        /// Suspended accounts cannot log in.
        is_active -> Bool,
        /// Account creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Department directory.
    departments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique department name.
        name -> Varchar,
        /// Physical location.
        location -> Varchar,
        /// Front-desk contact number.
        contact_number -> Nullable<Varchar>,
        /// Date the department was established.
        established_date -> Nullable<Date>,
        /// Suspended flag.
        is_active -> Bool,
    }
}

diesel::table! {
    /// Officer profiles, owned one-to-one by user accounts.
    officers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Backing user account (unique, cascade delete).
        user_id -> Uuid,
        /// Rank short code.
        rank -> Varchar,
        /// Unique badge number.
        badge_number -> Varchar,
        /// Department assignment (SET NULL on department delete).
        department_id -> Nullable<Uuid>,
        /// On-duty flag.
        on_duty -> Bool,
    }
}

diesel::table! {
    /// Crime reports.
    crime_reports (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique human-transcribable report code.
        code -> Varchar,
        /// Originating account (SET NULL on user delete).
        reporter_id -> Nullable<Uuid>,
        /// Routing target (SET NULL on department delete).
        department_id -> Nullable<Uuid>,
        /// Short summary.
        title -> Varchar,
        /// Full description.
        description -> Text,
        /// Free-text location.
        location -> Varchar,
        /// GPS latitude.
        latitude -> Nullable<Float8>,
        /// GPS longitude.
        longitude -> Nullable<Float8>,
        /// Incident classification code.
        incident_type -> Varchar,
        /// Urgency classification.
        priority -> Varchar,
        /// Lifecycle status.
        status -> Varchar,
        /// Photo evidence path.
        evidence_image -> Nullable<Varchar>,
        /// Video evidence path.
        evidence_video -> Nullable<Varchar>,
        /// Audio evidence path.
        evidence_audio -> Nullable<Varchar>,
        /// Submission timestamp, immutable.
        reported_at -> Timestamptz,
        /// Last mutation timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Officer board notifications.
    officer_notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Recipient officer (cascade delete).
        officer_id -> Uuid,
        /// Free-text message.
        message -> Text,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Citizen notifications.
    citizen_notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Recipient user (cascade delete).
        user_id -> Uuid,
        /// Category tag.
        kind -> Varchar,
        /// Short headline.
        title -> Varchar,
        /// Full message body.
        message -> Text,
        /// Triggering report (cascade delete).
        report_id -> Nullable<Uuid>,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(officers -> users (user_id));
diesel::joinable!(officers -> departments (department_id));
diesel::joinable!(crime_reports -> users (reporter_id));
diesel::joinable!(crime_reports -> departments (department_id));
diesel::joinable!(officer_notifications -> officers (officer_id));
diesel::joinable!(citizen_notifications -> users (user_id));
diesel::joinable!(citizen_notifications -> crime_reports (report_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    departments,
    officers,
    crime_reports,
    officer_notifications,
    citizen_notifications,
);
