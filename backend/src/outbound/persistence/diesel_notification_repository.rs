//! PostgreSQL-backed `NotificationRepository` implementation using Diesel
//! ORM, covering both the officer and citizen notification tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    NewCitizenNotification, NewOfficerNotification, NotificationRepository,
    NotificationRepositoryError,
};
use crate::domain::{
    CitizenNotification, CitizenNotificationKind, NotificationId, OfficerId,
    OfficerNotification, ReportId, UserId,
};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::{
    CitizenNotificationRow, NewCitizenNotificationRow, NewOfficerNotificationRow,
    OfficerNotificationRow,
};
use super::pool::DbPool;
use super::schema::{citizen_notifications, officer_notifications};

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DbFailure) -> NotificationRepositoryError {
    match failure {
        DbFailure::Connection(message) => NotificationRepositoryError::connection(message),
        DbFailure::Query(message) => NotificationRepositoryError::query(message),
        DbFailure::Unique { .. } => {
            NotificationRepositoryError::query("unexpected unique violation")
        }
    }
}

fn row_to_officer_notification(row: OfficerNotificationRow) -> OfficerNotification {
    OfficerNotification {
        id: NotificationId::from_uuid(row.id),
        officer: OfficerId::from_uuid(row.officer_id),
        message: row.message,
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

fn row_to_citizen_notification(
    row: CitizenNotificationRow,
) -> Result<CitizenNotification, NotificationRepositoryError> {
    let kind = CitizenNotificationKind::parse(&row.kind).ok_or_else(|| {
        NotificationRepositoryError::query(format!("corrupt kind column: {}", row.kind))
    })?;
    Ok(CitizenNotification {
        id: NotificationId::from_uuid(row.id),
        user: UserId::from_uuid(row.user_id),
        kind,
        title: row.title,
        message: row.message,
        report: row.report_id.map(ReportId::from_uuid),
        is_read: row.is_read,
        created_at: row.created_at,
    })
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert_officer_batch(
        &self,
        batch: &[NewOfficerNotification],
    ) -> Result<(), NotificationRepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<NewOfficerNotificationRow<'_>> = batch
            .iter()
            .map(|notification| NewOfficerNotificationRow {
                id: *NotificationId::random().as_uuid(),
                officer_id: *notification.officer.as_uuid(),
                message: &notification.message,
                is_read: false,
            })
            .collect();
        diesel::insert_into(officer_notifications::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(())
    }

    async fn insert_citizen(
        &self,
        notification: &NewCitizenNotification,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let row = NewCitizenNotificationRow {
            id: *NotificationId::random().as_uuid(),
            user_id: *notification.user.as_uuid(),
            kind: notification.kind.as_str(),
            title: &notification.title,
            message: &notification.message,
            report_id: notification.report.map(Into::into),
            is_read: false,
        };
        diesel::insert_into(citizen_notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(())
    }

    async fn list_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<Vec<OfficerNotification>, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<OfficerNotificationRow> = officer_notifications::table
            .filter(officer_notifications::officer_id.eq(officer.as_uuid()))
            .order(officer_notifications::created_at.desc())
            .select(OfficerNotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        Ok(rows.into_iter().map(row_to_officer_notification).collect())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<CitizenNotification>, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<CitizenNotificationRow> = citizen_notifications::table
            .filter(citizen_notifications::user_id.eq(user.as_uuid()))
            .order(citizen_notifications::created_at.desc())
            .select(CitizenNotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        rows.into_iter().map(row_to_citizen_notification).collect()
    }

    async fn unread_count_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let count: i64 = officer_notifications::table
            .filter(officer_notifications::officer_id.eq(officer.as_uuid()))
            .filter(officer_notifications::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(non_negative(count))
    }

    async fn unread_count_for_user(
        &self,
        user: &UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let count: i64 = citizen_notifications::table
            .filter(citizen_notifications::user_id.eq(user.as_uuid()))
            .filter(citizen_notifications::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(non_negative(count))
    }

    async fn find_citizen_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<CitizenNotification>, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let row: Option<CitizenNotificationRow> = citizen_notifications::table
            .find(id.as_uuid())
            .select(CitizenNotificationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        row.map(row_to_citizen_notification).transpose()
    }

    async fn mark_citizen_read(
        &self,
        id: &NotificationId,
    ) -> Result<(), NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        diesel::update(citizen_notifications::table.find(id.as_uuid()))
            .set(citizen_notifications::is_read.eq(true))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(())
    }

    async fn mark_all_read_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let changed = diesel::update(
            officer_notifications::table
                .filter(officer_notifications::officer_id.eq(officer.as_uuid()))
                .filter(officer_notifications::is_read.eq(false)),
        )
        .set(officer_notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(changed as u64)
    }

    async fn mark_all_read_for_user(
        &self,
        user: &UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let changed = diesel::update(
            citizen_notifications::table
                .filter(citizen_notifications::user_id.eq(user.as_uuid()))
                .filter(citizen_notifications::is_read.eq(false)),
        )
        .set(citizen_notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(changed as u64)
    }
}
