//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! via the `test-support` feature). Provides an in-memory implementation
//! of every persistence port with the same constraint semantics as the
//! PostgreSQL schema, plus a plaintext credential hasher and an evidence
//! store that records writes instead of touching the filesystem.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, DepartmentRepository, DepartmentRepositoryError,
    EvidenceStore, EvidenceStoreError, EvidenceUpload, NewCitizenNotification,
    NewOfficerNotification, NewUserRecord, NotificationRepository, NotificationRepositoryError,
    OfficerRepository, OfficerRepositoryError, ReportRepository, ReportRepositoryError,
    ReportScope, StatusCounts, StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AuthService, BadgeNumber, CitizenNotification, CrimeReport, Department, DepartmentId,
    DirectoryService, EmailAddress, EvidenceRefs, IncidentType, NotificationId,
    NotificationService, Officer, OfficerId, OfficerNotification, Priority, Rank, ReportCode,
    ReportId, ReportService, ReportStatus, Role, User, UserId,
};
use crate::inbound::http::AppState;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing key per invocation, names the cookie
/// `session`, and disables the `Secure` flag for plain-HTTP test calls.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Credential hasher with no work factor, for deterministic tests.
///
/// Stored form is `plain:<password>`; seed users with that shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCredentialHasher;

impl CredentialHasher for PlainCredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHasherError> {
        Ok(stored_hash == format!("plain:{password}"))
    }
}

/// Evidence store that records writes instead of touching the filesystem.
#[derive(Debug, Default)]
pub struct RecordingEvidenceStore {
    writes: Mutex<Vec<String>>,
}

impl RecordingEvidenceStore {
    /// Paths returned so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.writes.lock().expect("evidence lock").clone()
    }
}

#[async_trait]
impl EvidenceStore for RecordingEvidenceStore {
    async fn store(&self, upload: &EvidenceUpload) -> Result<String, EvidenceStoreError> {
        let day = Utc::now().format("%Y/%m/%d");
        let path = format!(
            "evidence/{}/{day}/{}.{}",
            upload.kind.subdir(),
            Uuid::new_v4().simple(),
            upload.extension
        );
        self.writes.lock().expect("evidence lock").push(path.clone());
        Ok(path)
    }
}

#[derive(Default)]
struct StoreState {
    users: Vec<(User, String)>,
    officers: Vec<Officer>,
    departments: Vec<Department>,
    reports: Vec<CrimeReport>,
    officer_notifications: Vec<OfficerNotification>,
    citizen_notifications: Vec<CitizenNotification>,
}

/// In-memory store implementing every persistence port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("store lock")
    }

    /// Seed a department and return it.
    pub fn seed_department(&self, name: &str) -> Department {
        let department = Department {
            id: DepartmentId::random(),
            name: name.to_owned(),
            location: "12 High Street".to_owned(),
            contact_number: None,
            established_date: None,
            is_active: true,
        };
        self.lock().departments.push(department.clone());
        department
    }

    fn seed_user(&self, email: &str, password: &str, role: Role) -> User {
        let user = User {
            id: UserId::random(),
            email: EmailAddress::new(email).expect("valid seed email"),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            phone: None,
            address: None,
            role,
            is_active: true,
            created_at: Utc::now(),
        };
        self.lock()
            .users
            .push((user.clone(), format!("plain:{password}")));
        user
    }

    /// Seed an admin account.
    pub fn seed_admin(&self, email: &str, password: &str) -> User {
        self.seed_user(email, password, Role::Admin)
    }

    /// Seed a citizen account.
    pub fn seed_citizen(&self, email: &str, password: &str) -> User {
        self.seed_user(email, password, Role::Citizen)
    }

    /// Seed an officer account (user plus profile).
    pub fn seed_officer(
        &self,
        email: &str,
        password: &str,
        badge: &str,
        department: Option<DepartmentId>,
    ) -> (Officer, User) {
        let user = self.seed_user(email, password, Role::Officer);
        let officer = Officer {
            id: OfficerId::random(),
            user_id: user.id,
            rank: Rank::Asp,
            badge_number: BadgeNumber::new(badge).expect("valid seed badge"),
            department,
            on_duty: true,
        };
        self.lock().officers.push(officer.clone());
        (officer, user)
    }

    /// Seed a report directly, bypassing the lifecycle engine.
    pub fn seed_report(
        &self,
        reporter: Option<UserId>,
        department: Option<DepartmentId>,
        status: ReportStatus,
    ) -> CrimeReport {
        let now = Utc::now();
        let report = CrimeReport {
            id: ReportId::random(),
            code: ReportCode::generate(),
            reporter,
            department,
            title: "Seeded report".to_owned(),
            description: "Seeded description".to_owned(),
            location: "Seeded location".to_owned(),
            coordinates: None,
            incident_type: IncidentType::Other,
            priority: Priority::Medium,
            status,
            evidence: EvidenceRefs::default(),
            reported_at: now,
            updated_at: now,
        };
        self.lock().reports.push(report.clone());
        report
    }

    /// Current state of a report.
    pub fn report(&self, id: &ReportId) -> Option<CrimeReport> {
        self.lock().reports.iter().find(|r| r.id == *id).cloned()
    }

    /// All notifications delivered to an officer, newest first.
    pub fn officer_notifications(&self, officer: &OfficerId) -> Vec<OfficerNotification> {
        let mut rows: Vec<OfficerNotification> = self
            .lock()
            .officer_notifications
            .iter()
            .filter(|n| n.officer == *officer)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    /// All notifications delivered to a citizen, newest first.
    pub fn citizen_notifications(&self, user: &UserId) -> Vec<CitizenNotification> {
        let mut rows: Vec<CitizenNotification> = self
            .lock()
            .citizen_notifications
            .iter()
            .filter(|n| n.user == *user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|(user, _)| user.email == record.user.email)
        {
            return Err(UserRepositoryError::duplicate_email(
                record.user.email.as_ref(),
            ));
        }
        if let Some(phone) = &record.user.phone {
            if state
                .users
                .iter()
                .any(|(user, _)| user.phone.as_ref() == Some(phone))
            {
                return Err(UserRepositoryError::duplicate_phone(phone.clone()));
            }
        }
        state
            .users
            .push((record.user.clone(), record.password_hash.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.id == *id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_for_login(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.email == *email)
            .map(|(user, hash)| StoredCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }
}

#[async_trait]
impl OfficerRepository for InMemoryStore {
    async fn insert(&self, officer: &Officer) -> Result<(), OfficerRepositoryError> {
        let mut state = self.lock();
        if state
            .officers
            .iter()
            .any(|existing| existing.badge_number == officer.badge_number)
        {
            return Err(OfficerRepositoryError::duplicate_badge(
                officer.badge_number.as_ref(),
            ));
        }
        state.officers.push(officer.clone());
        Ok(())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Officer>, OfficerRepositoryError> {
        Ok(self
            .lock()
            .officers
            .iter()
            .find(|officer| officer.user_id == *user_id)
            .cloned())
    }

    async fn list_with_users(&self) -> Result<Vec<(Officer, User)>, OfficerRepositoryError> {
        let state = self.lock();
        Ok(state
            .officers
            .iter()
            .filter_map(|officer| {
                state
                    .users
                    .iter()
                    .find(|(user, _)| user.id == officer.user_id)
                    .map(|(user, _)| (officer.clone(), user.clone()))
            })
            .collect())
    }

    async fn list_by_department(
        &self,
        department: &DepartmentId,
    ) -> Result<Vec<Officer>, OfficerRepositoryError> {
        Ok(self
            .lock()
            .officers
            .iter()
            .filter(|officer| officer.department == Some(*department))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn insert(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut state = self.lock();
        if state
            .departments
            .iter()
            .any(|existing| existing.name == department.name)
        {
            return Err(DepartmentRepositoryError::duplicate_name(
                department.name.clone(),
            ));
        }
        state.departments.push(department.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        Ok(self
            .lock()
            .departments
            .iter()
            .find(|department| department.id == *id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut departments = self.lock().departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn list_with_officer_counts(
        &self,
    ) -> Result<Vec<(Department, u64)>, DepartmentRepositoryError> {
        let state = self.lock();
        let mut departments = state.departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments
            .into_iter()
            .map(|department| {
                let count = state
                    .officers
                    .iter()
                    .filter(|officer| officer.department == Some(department.id))
                    .count() as u64;
                (department, count)
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, DepartmentRepositoryError> {
        Ok(self.lock().departments.len() as u64)
    }
}

fn in_scope(report: &CrimeReport, scope: &ReportScope) -> bool {
    match scope {
        ReportScope::All => true,
        ReportScope::Department(id) => report.department == Some(*id),
        ReportScope::Reporter(id) => report.reporter == Some(*id),
    }
}

fn newest_first(mut reports: Vec<CrimeReport>) -> Vec<CrimeReport> {
    reports.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
    reports
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn insert(&self, report: &CrimeReport) -> Result<(), ReportRepositoryError> {
        let mut state = self.lock();
        if state
            .reports
            .iter()
            .any(|existing| existing.code == report.code)
        {
            return Err(ReportRepositoryError::duplicate_code(report.code.as_ref()));
        }
        state.reports.push(report.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ReportId,
    ) -> Result<Option<CrimeReport>, ReportRepositoryError> {
        Ok(self.lock().reports.iter().find(|r| r.id == *id).cloned())
    }

    async fn list(&self, scope: &ReportScope) -> Result<Vec<CrimeReport>, ReportRepositoryError> {
        let reports = self
            .lock()
            .reports
            .iter()
            .filter(|report| in_scope(report, scope))
            .cloned()
            .collect();
        Ok(newest_first(reports))
    }

    async fn recent(
        &self,
        scope: &ReportScope,
        limit: u32,
    ) -> Result<Vec<CrimeReport>, ReportRepositoryError> {
        let mut reports = ReportRepository::list(self, scope).await?;
        reports.truncate(limit as usize);
        Ok(reports)
    }

    async fn search(
        &self,
        scope: &ReportScope,
        query: &str,
    ) -> Result<Vec<CrimeReport>, ReportRepositoryError> {
        let needle = query.to_lowercase();
        let matches = |report: &CrimeReport| {
            report.code.as_ref().to_lowercase().contains(&needle)
                || report.location.to_lowercase().contains(&needle)
                || report.status.as_str().to_lowercase().contains(&needle)
                || report
                    .incident_type
                    .as_str()
                    .to_lowercase()
                    .contains(&needle)
        };
        let reports = self
            .lock()
            .reports
            .iter()
            .filter(|report| in_scope(report, scope) && matches(report))
            .cloned()
            .collect();
        Ok(newest_first(reports))
    }

    async fn status_counts(
        &self,
        scope: &ReportScope,
    ) -> Result<StatusCounts, ReportRepositoryError> {
        let mut counts = StatusCounts::default();
        for report in self.lock().reports.iter().filter(|r| in_scope(r, scope)) {
            counts.total += 1;
            match report.status {
                ReportStatus::Pending => counts.pending += 1,
                ReportStatus::Investigating => counts.investigating += 1,
                ReportStatus::Resolved => counts.resolved += 1,
                ReportStatus::Dismissed => counts.dismissed += 1,
            }
        }
        Ok(counts)
    }

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportRepositoryError> {
        let mut state = self.lock();
        let Some(report) = state.reports.iter_mut().find(|r| r.id == *id) else {
            return Err(ReportRepositoryError::query("report not found for update"));
        };
        report.status = status;
        report.updated_at = Utc::now();
        Ok(())
    }

    async fn set_department(
        &self,
        id: &ReportId,
        department: &DepartmentId,
    ) -> Result<(), ReportRepositoryError> {
        let mut state = self.lock();
        let Some(report) = state.reports.iter_mut().find(|r| r.id == *id) else {
            return Err(ReportRepositoryError::query("report not found for update"));
        };
        report.department = Some(*department);
        report.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert_officer_batch(
        &self,
        batch: &[NewOfficerNotification],
    ) -> Result<(), NotificationRepositoryError> {
        let mut state = self.lock();
        for entry in batch {
            state.officer_notifications.push(OfficerNotification {
                id: NotificationId::random(),
                officer: entry.officer,
                message: entry.message.clone(),
                is_read: false,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn insert_citizen(
        &self,
        notification: &NewCitizenNotification,
    ) -> Result<(), NotificationRepositoryError> {
        self.lock().citizen_notifications.push(CitizenNotification {
            id: NotificationId::random(),
            user: notification.user,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            report: notification.report,
            is_read: false,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<Vec<OfficerNotification>, NotificationRepositoryError> {
        Ok(self.officer_notifications(officer))
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<CitizenNotification>, NotificationRepositoryError> {
        Ok(self.citizen_notifications(user))
    }

    async fn unread_count_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(self
            .lock()
            .officer_notifications
            .iter()
            .filter(|n| n.officer == *officer && !n.is_read)
            .count() as u64)
    }

    async fn unread_count_for_user(
        &self,
        user: &UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(self
            .lock()
            .citizen_notifications
            .iter()
            .filter(|n| n.user == *user && !n.is_read)
            .count() as u64)
    }

    async fn find_citizen_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<CitizenNotification>, NotificationRepositoryError> {
        Ok(self
            .lock()
            .citizen_notifications
            .iter()
            .find(|n| n.id == *id)
            .cloned())
    }

    async fn mark_citizen_read(
        &self,
        id: &NotificationId,
    ) -> Result<(), NotificationRepositoryError> {
        let mut state = self.lock();
        if let Some(notification) = state
            .citizen_notifications
            .iter_mut()
            .find(|n| n.id == *id)
        {
            notification.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_read_for_officer(
        &self,
        officer: &OfficerId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut state = self.lock();
        let mut changed = 0;
        for notification in state
            .officer_notifications
            .iter_mut()
            .filter(|n| n.officer == *officer && !n.is_read)
        {
            notification.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn mark_all_read_for_user(
        &self,
        user: &UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut state = self.lock();
        let mut changed = 0;
        for notification in state
            .citizen_notifications
            .iter_mut()
            .filter(|n| n.user == *user && !n.is_read)
        {
            notification.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

/// Build an [`AppState`] wired over a shared [`InMemoryStore`].
///
/// The store is returned alongside so tests can seed data and inspect
/// side effects directly.
pub fn test_app_state() -> (web::Data<AppState>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let hasher = Arc::new(PlainCredentialHasher);
    let evidence = Arc::new(RecordingEvidenceStore::default());

    let notifier = Arc::new(NotificationService::new(store.clone(), store.clone()));
    let auth = Arc::new(AuthService::new(store.clone(), store.clone(), hasher.clone()));
    let directory = Arc::new(DirectoryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        hasher,
    ));
    let reports = Arc::new(ReportService::new(
        store.clone(),
        store.clone(),
        evidence,
        notifier.clone(),
    ));

    (
        web::Data::new(AppState::new(auth, directory, reports, notifier)),
        store,
    )
}
