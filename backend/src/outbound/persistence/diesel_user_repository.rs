//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    NewUserRecord, StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{EmailAddress, Role, User, UserId};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DbFailure, record: &NewUserRecord) -> UserRepositoryError {
    if failure.unique_on("email") {
        return UserRepositoryError::duplicate_email(record.user.email.as_ref());
    }
    if failure.unique_on("phone") {
        return UserRepositoryError::duplicate_phone(
            record.user.phone.clone().unwrap_or_default(),
        );
    }
    map_read_failure(failure)
}

fn map_read_failure(failure: DbFailure) -> UserRepositoryError {
    match failure {
        DbFailure::Connection(message) => UserRepositoryError::connection(message),
        DbFailure::Query(message) => UserRepositoryError::query(message),
        DbFailure::Unique { .. } => UserRepositoryError::query("unexpected unique violation"),
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserRepositoryError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| UserRepositoryError::query(format!("corrupt email column: {err}")))?;
    let role = Role::parse(&row.role)
        .ok_or_else(|| UserRepositoryError::query(format!("corrupt role column: {}", row.role)))?;
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
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err), record))?;

        let row = NewUserRow {
            id: *record.user.id.as_uuid(),
            email: record.user.email.as_ref(),
            password_hash: &record.password_hash,
            first_name: &record.user.first_name,
            last_name: &record.user.last_name,
            phone: record.user.phone.as_deref(),
            address: record.user.address.as_deref(),
            role: record.user.role.as_str(),
            is_active: record.user.is_active,
            created_at: record.user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err), record))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_read_failure(classify_pool_error(err)))?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_failure(classify_diesel_error(err)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_for_login(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_read_failure(classify_pool_error(err)))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_failure(classify_diesel_error(err)))?;

        row.map(|row| {
            let user = row_to_user(&row)?;
            Ok(StoredCredentials {
                user,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }
}
