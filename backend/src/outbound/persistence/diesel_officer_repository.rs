//! PostgreSQL-backed `OfficerRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OfficerRepository, OfficerRepositoryError};
use crate::domain::{
    BadgeNumber, DepartmentId, EmailAddress, Officer, OfficerId, Rank, Role, User, UserId,
};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::{NewOfficerRow, OfficerRow, UserRow};
use super::pool::DbPool;
use super::schema::{officers, users};

/// Diesel-backed implementation of the `OfficerRepository` port.
#[derive(Clone)]
pub struct DieselOfficerRepository {
    pool: DbPool,
}

impl DieselOfficerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_insert_failure(failure: DbFailure, officer: &Officer) -> OfficerRepositoryError {
    if failure.unique_on("badge") {
        return OfficerRepositoryError::duplicate_badge(officer.badge_number.as_ref());
    }
    map_failure(failure)
}

fn map_failure(failure: DbFailure) -> OfficerRepositoryError {
    match failure {
        DbFailure::Connection(message) => OfficerRepositoryError::connection(message),
        DbFailure::Query(message) => OfficerRepositoryError::query(message),
        DbFailure::Unique { .. } => OfficerRepositoryError::query("unexpected unique violation"),
    }
}

fn row_to_officer(row: &OfficerRow) -> Result<Officer, OfficerRepositoryError> {
    let rank = Rank::parse(&row.rank)
        .ok_or_else(|| OfficerRepositoryError::query(format!("corrupt rank column: {}", row.rank)))?;
    let badge_number = BadgeNumber::new(&row.badge_number)
        .map_err(|err| OfficerRepositoryError::query(format!("corrupt badge column: {err}")))?;
    Ok(Officer {
        id: OfficerId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        rank,
        badge_number,
        department: row.department_id.map(DepartmentId::from_uuid),
        on_duty: row.on_duty,
    })
}

fn row_to_user(row: &UserRow) -> Result<User, OfficerRepositoryError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| OfficerRepositoryError::query(format!("corrupt email column: {err}")))?;
    let role = Role::parse(&row.role)
        .ok_or_else(|| OfficerRepositoryError::query(format!("corrupt role column: {}", row.role)))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        phone: row.phone.clone(),
        address: row.address.clone(),
        role,
        is_active: row.is_active,
        created_at: row.created_at,
    })
}

#[async_trait]
impl OfficerRepository for DieselOfficerRepository {
    async fn insert(&self, officer: &Officer) -> Result<(), OfficerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_insert_failure(classify_pool_error(err), officer))?;

        let row = NewOfficerRow {
            id: *officer.id.as_uuid(),
            user_id: *officer.user_id.as_uuid(),
            rank: officer.rank.as_str(),
            badge_number: officer.badge_number.as_ref(),
            department_id: officer.department.map(Into::into),
            on_duty: officer.on_duty,
        };
        diesel::insert_into(officers::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_failure(classify_diesel_error(err), officer))?;
        Ok(())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Officer>, OfficerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let row: Option<OfficerRow> = officers::table
            .filter(officers::user_id.eq(user_id.as_uuid()))
            .select(OfficerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        row.as_ref().map(row_to_officer).transpose()
    }

    async fn list_with_users(&self) -> Result<Vec<(Officer, User)>, OfficerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<(OfficerRow, UserRow)> = officers::table
            .inner_join(users::table)
            .select((OfficerRow::as_select(), UserRow::as_select()))
            .order(officers::badge_number.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        rows.iter()
            .map(|(officer_row, user_row)| {
                Ok((row_to_officer(officer_row)?, row_to_user(user_row)?))
            })
            .collect()
    }

    async fn list_by_department(
        &self,
        department: &DepartmentId,
    ) -> Result<Vec<Officer>, OfficerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<OfficerRow> = officers::table
            .filter(officers::department_id.eq(department.as_uuid()))
            .select(OfficerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        rows.iter().map(row_to_officer).collect()
    }
}
