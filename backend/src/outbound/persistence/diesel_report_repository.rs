//! PostgreSQL-backed `ReportRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReportRepository, ReportRepositoryError, ReportScope, StatusCounts};
use crate::domain::{
    CrimeReport, DepartmentId, EvidenceRefs, GeoPoint, IncidentType, Priority, ReportCode,
    ReportId, ReportStatus, UserId,
};

use super::diesel_error::{classify_diesel_error, classify_pool_error, DbFailure};
use super::models::{CrimeReportRow, NewCrimeReportRow};
use super::pool::DbPool;
use super::schema::crime_reports;

type BoxedReports<'a> = crime_reports::BoxedQuery<'a, diesel::pg::Pg>;

/// Diesel-backed implementation of the `ReportRepository` port.
#[derive(Clone)]
pub struct DieselReportRepository {
    pool: DbPool,
}

impl DieselReportRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_insert_failure(failure: DbFailure, report: &CrimeReport) -> ReportRepositoryError {
    if failure.unique_on("code") {
        return ReportRepositoryError::duplicate_code(report.code.as_ref());
    }
    map_failure(failure)
}

fn map_failure(failure: DbFailure) -> ReportRepositoryError {
    match failure {
        DbFailure::Connection(message) => ReportRepositoryError::connection(message),
        DbFailure::Query(message) => ReportRepositoryError::query(message),
        DbFailure::Unique { .. } => ReportRepositoryError::query("unexpected unique violation"),
    }
}

/// Apply the visibility scope as a filter over the reports table.
fn scoped(scope: &ReportScope) -> BoxedReports<'static> {
    let query = crime_reports::table.into_boxed();
    match scope {
        ReportScope::All => query,
        ReportScope::Department(id) => {
            query.filter(crime_reports::department_id.eq(*id.as_uuid()))
        }
        ReportScope::Reporter(id) => query.filter(crime_reports::reporter_id.eq(*id.as_uuid())),
    }
}

fn row_to_report(row: CrimeReportRow) -> Result<CrimeReport, ReportRepositoryError> {
    let code = ReportCode::parse(&row.code)
        .map_err(|err| ReportRepositoryError::query(format!("corrupt code column: {err}")))?;
    let incident_type = IncidentType::parse(&row.incident_type).ok_or_else(|| {
        ReportRepositoryError::query(format!("corrupt incident_type column: {}", row.incident_type))
    })?;
    let priority = Priority::parse(&row.priority).ok_or_else(|| {
        ReportRepositoryError::query(format!("corrupt priority column: {}", row.priority))
    })?;
    let status = ReportStatus::parse(&row.status).ok_or_else(|| {
        ReportRepositoryError::query(format!("corrupt status column: {}", row.status))
    })?;
    let coordinates = match (row.latitude, row.longitude) {
        (Some(latitude), Some(longitude)) => Some(
            GeoPoint::new(latitude, longitude)
                .map_err(|err| ReportRepositoryError::query(format!("corrupt coordinates: {err}")))?,
        ),
        _ => None,
    };
    Ok(CrimeReport {
        id: ReportId::from_uuid(row.id),
        code,
        reporter: row.reporter_id.map(UserId::from_uuid),
        department: row.department_id.map(DepartmentId::from_uuid),
        title: row.title,
        description: row.description,
        location: row.location,
        coordinates,
        incident_type,
        priority,
        status,
        evidence: EvidenceRefs {
            image: row.evidence_image,
            video: row.evidence_video,
            audio: row.evidence_audio,
        },
        reported_at: row.reported_at,
        updated_at: row.updated_at,
    })
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn insert(&self, report: &CrimeReport) -> Result<(), ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_insert_failure(classify_pool_error(err), report))?;

        let row = NewCrimeReportRow {
            id: *report.id.as_uuid(),
            code: report.code.as_ref(),
            reporter_id: report.reporter.map(Into::into),
            department_id: report.department.map(Into::into),
            title: &report.title,
            description: &report.description,
            location: &report.location,
            latitude: report.coordinates.map(|point| point.latitude),
            longitude: report.coordinates.map(|point| point.longitude),
            incident_type: report.incident_type.as_str(),
            priority: report.priority.as_str(),
            status: report.status.as_str(),
            evidence_image: report.evidence.image.as_deref(),
            evidence_video: report.evidence.video.as_deref(),
            evidence_audio: report.evidence.audio.as_deref(),
            reported_at: report.reported_at,
            updated_at: report.updated_at,
        };
        diesel::insert_into(crime_reports::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_failure(classify_diesel_error(err), report))?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ReportId,
    ) -> Result<Option<CrimeReport>, ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let row: Option<CrimeReportRow> = crime_reports::table
            .find(id.as_uuid())
            .select(CrimeReportRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        row.map(row_to_report).transpose()
    }

    async fn list(&self, scope: &ReportScope) -> Result<Vec<CrimeReport>, ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<CrimeReportRow> = scoped(scope)
            .order(crime_reports::reported_at.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        rows.into_iter().map(row_to_report).collect()
    }

    async fn recent(
        &self,
        scope: &ReportScope,
        limit: u32,
    ) -> Result<Vec<CrimeReport>, ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let rows: Vec<CrimeReportRow> = scoped(scope)
            .order(crime_reports::reported_at.desc())
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        rows.into_iter().map(row_to_report).collect()
    }

    async fn search(
        &self,
        scope: &ReportScope,
        query: &str,
    ) -> Result<Vec<CrimeReport>, ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let pattern = format!("%{query}%");
        let rows: Vec<CrimeReportRow> = scoped(scope)
            .filter(
                crime_reports::code
                    .ilike(pattern.clone())
                    .or(crime_reports::location.ilike(pattern.clone()))
                    .or(crime_reports::status.ilike(pattern.clone()))
                    .or(crime_reports::incident_type.ilike(pattern)),
            )
            .order(crime_reports::reported_at.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;

        rows.into_iter().map(row_to_report).collect()
    }

    async fn status_counts(
        &self,
        scope: &ReportScope,
    ) -> Result<StatusCounts, ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let grouped = crime_reports::table
            .group_by(crime_reports::status)
            .select((crime_reports::status, count_star()));
        let rows: Vec<(String, i64)> = match scope {
            ReportScope::All => grouped.load(&mut conn).await,
            ReportScope::Department(id) => {
                grouped
                    .filter(crime_reports::department_id.eq(*id.as_uuid()))
                    .load(&mut conn)
                    .await
            }
            ReportScope::Reporter(id) => {
                grouped
                    .filter(crime_reports::reporter_id.eq(*id.as_uuid()))
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(|err| map_failure(classify_diesel_error(err)))?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let tally = non_negative(count);
            counts.total += tally;
            match ReportStatus::parse(&status) {
                Some(ReportStatus::Pending) => counts.pending = tally,
                Some(ReportStatus::Investigating) => counts.investigating = tally,
                Some(ReportStatus::Resolved) => counts.resolved = tally,
                Some(ReportStatus::Dismissed) => counts.dismissed = tally,
                None => {
                    return Err(ReportRepositoryError::query(format!(
                        "corrupt status column: {status}"
                    )))
                }
            }
        }
        Ok(counts)
    }

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let changed = diesel::update(crime_reports::table.find(id.as_uuid()))
            .set((
                crime_reports::status.eq(status.as_str()),
                crime_reports::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        if changed == 0 {
            return Err(ReportRepositoryError::query("report not found for update"));
        }
        Ok(())
    }

    async fn set_department(
        &self,
        id: &ReportId,
        department: &DepartmentId,
    ) -> Result<(), ReportRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool_error(err)))?;

        let changed = diesel::update(crime_reports::table.find(id.as_uuid()))
            .set((
                crime_reports::department_id.eq(department.as_uuid()),
                crime_reports::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err)))?;
        if changed == 0 {
            return Err(ReportRepositoryError::query("report not found for update"));
        }
        Ok(())
    }
}
