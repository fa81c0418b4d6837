//! PostgreSQL-backed `DepartmentRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DepartmentRepository, DepartmentRepositoryError};
use crate::domain::{Department, DepartmentId};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::{DepartmentRow, NewDepartmentRow};
use super::pool::DbPool;
use super::schema::{departments, officers};

/// Diesel-backed implementation of the `DepartmentRepository` port.
#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_insert_failure(failure: DbFailure, department: &Department) -> DepartmentRepositoryError {
    if failure.unique_on("name") {
        return DepartmentRepositoryError::duplicate_name(department.name.clone());
    }
    map_failure(failure)
}

fn map_failure(failure: DbFailure) -> DepartmentRepositoryError {
    match failure {
        DbFailure::Connection(message) => DepartmentRepositoryError::connection(message),
        DbFailure::Query(message) => DepartmentRepositoryError::query(message),
        DbFailure::Unique { .. } => {
            DepartmentRepositoryError::query("unexpected unique violation")
        }
    }
}

fn row_to_department(row: DepartmentRow) -> Department {
    Department {
        id: DepartmentId::from_uuid(row.id),
        name: row.name,
        location: row.location,
        contact_number: row.contact_number,
        established_date: row.established_date,
        is_active: row.is_active,
    }
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn insert(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_insert_failure(classify_pool_error(err), department))?;

        let row = NewDepartmentRow {
            id: *department.id.as_uuid(),
            name: &department.name,
            location: &department.location,
            contact_number: department.contact_number.as_deref(),
            established_date: department.established_date,
            is_active: department.is_active,
        };
        diesel::insert_into(departments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_failure(classify_diesel_error(err), department))?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let row: Option<DepartmentRow> = departments::table
            .find(id.as_uuid())
            .select(DepartmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        Ok(row.map(row_to_department))
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<DepartmentRow> = departments::table
            .order(departments::name.asc())
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        Ok(rows.into_iter().map(row_to_department).collect())
    }

    async fn list_with_officer_counts(
        &self,
    ) -> Result<Vec<(Department, u64)>, DepartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<DepartmentRow> = departments::table
            .order(departments::name.asc())
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        let counts: Vec<(Option<Uuid>, i64)> = officers::table
            .group_by(officers::department_id)
            .select((officers::department_id, count_star()))
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        let by_department: HashMap<Uuid, i64> = counts
            .into_iter()
            .filter_map(|(department_id, count)| department_id.map(|id| (id, count)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let count = by_department.get(&row.id).copied().unwrap_or_default();
                (row_to_department(row), non_negative(count))
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, DepartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let total: i64 = departments::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        Ok(non_negative(total))
    }
}
