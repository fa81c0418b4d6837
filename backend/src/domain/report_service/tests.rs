//! Regression coverage for the report lifecycle engine.

use chrono::Utc;
use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::department::Department;
use crate::domain::ids::{OfficerId, UserId};
use crate::domain::officer::{BadgeNumber, Officer, Rank};
use crate::domain::ports::{
    MockDepartmentRepository, MockEvidenceStore, MockNotificationRepository,
    MockOfficerRepository, MockReportRepository, NewCitizenNotification, NewOfficerNotification,
};
use crate::domain::report::{EvidenceRefs, IncidentType, Priority};
use crate::domain::ErrorCode;

struct Mocks {
    reports: MockReportRepository,
    departments: MockDepartmentRepository,
    evidence: MockEvidenceStore,
    officers: MockOfficerRepository,
    notifications: MockNotificationRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            reports: MockReportRepository::new(),
            departments: MockDepartmentRepository::new(),
            evidence: MockEvidenceStore::new(),
            officers: MockOfficerRepository::new(),
            notifications: MockNotificationRepository::new(),
        }
    }

    fn into_service(self) -> ReportService {
        let notifier = Arc::new(NotificationService::new(
            Arc::new(self.officers),
            Arc::new(self.notifications),
        ));
        ReportService::new(
            Arc::new(self.reports),
            Arc::new(self.departments),
            Arc::new(self.evidence),
            notifier,
        )
    }
}

fn department(name: &str) -> Department {
    Department {
        id: DepartmentId::random(),
        name: name.into(),
        location: "12 High Street".into(),
        contact_number: None,
        established_date: None,
        is_active: true,
    }
}

fn officer_in(department: DepartmentId) -> Officer {
    Officer {
        id: OfficerId::random(),
        user_id: UserId::random(),
        rank: Rank::Asp,
        badge_number: {
            let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(28).collect();
            BadgeNumber::new(format!("B-{suffix}")).expect("valid badge")
        },
        department: Some(department),
        on_duty: true,
    }
}

fn draft(department: Option<DepartmentId>) -> ReportDraft {
    ReportDraft::try_new(
        "Stolen bike",
        "Taken overnight from the rack",
        "Market Square",
        None,
        IncidentType::Theft,
        Priority::Medium,
        department,
    )
    .expect("valid draft")
}

fn stored_report(
    department: Option<DepartmentId>,
    reporter: Option<UserId>,
    status: ReportStatus,
) -> CrimeReport {
    let now = Utc::now();
    CrimeReport {
        id: ReportId::random(),
        code: ReportCode::generate(),
        reporter,
        department,
        title: "Stolen bike".into(),
        description: "Taken overnight from the rack".into(),
        location: "Market Square".into(),
        coordinates: None,
        incident_type: IncidentType::Theft,
        priority: Priority::Medium,
        status,
        evidence: EvidenceRefs::default(),
        reported_at: now,
        updated_at: now,
    }
}

fn citizen() -> Identity {
    Identity::Citizen {
        user_id: UserId::random(),
    }
}

fn admin() -> Identity {
    Identity::Admin {
        user_id: UserId::random(),
    }
}

#[tokio::test]
async fn citizen_submission_notifies_every_department_officer() {
    let dept = department("Central");
    let dept_id = dept.id;
    let members = vec![officer_in(dept_id), officer_in(dept_id)];

    let mut mocks = Mocks::new();
    mocks
        .departments
        .expect_find_by_id()
        .with(eq(dept_id))
        .times(1)
        .return_once(move |_| Ok(Some(dept)));
    mocks
        .reports
        .expect_insert()
        .withf(move |report: &CrimeReport| {
            report.status == ReportStatus::Pending && report.department == Some(dept_id)
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .officers
        .expect_list_by_department()
        .with(eq(dept_id))
        .times(1)
        .return_once(move |_| Ok(members));
    mocks
        .notifications
        .expect_insert_officer_batch()
        .withf(|batch: &[NewOfficerNotification]| {
            batch.len() == 2 && batch.iter().all(|row| row.message.starts_with("New crime reported:"))
        })
        .times(1)
        .return_once(|_| Ok(()));

    let identity = citizen();
    let reporter = *identity.user_id();
    let report = mocks
        .into_service()
        .create(&identity, draft(Some(dept_id)), EvidenceUploads::default())
        .await
        .expect("creation succeeds");
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.reporter, Some(reporter));
}

#[tokio::test]
async fn officer_submissions_are_forced_into_their_own_department() {
    let own_dept = department("Central");
    let own_dept_id = own_dept.id;
    let requested = DepartmentId::random();

    let mut mocks = Mocks::new();
    mocks
        .departments
        .expect_find_by_id()
        .with(eq(own_dept_id))
        .times(1)
        .return_once(move |_| Ok(Some(own_dept)));
    mocks
        .reports
        .expect_insert()
        .withf(move |report: &CrimeReport| report.department == Some(own_dept_id))
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .officers
        .expect_list_by_department()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let identity = Identity::Officer {
        user_id: UserId::random(),
        officer_id: OfficerId::random(),
        department: Some(own_dept_id),
    };
    let report = mocks
        .into_service()
        .create(&identity, draft(Some(requested)), EvidenceUploads::default())
        .await
        .expect("creation succeeds");
    assert_eq!(report.department, Some(own_dept_id));
}

#[tokio::test]
async fn unknown_departments_are_rejected_before_any_write() {
    let mut mocks = Mocks::new();
    mocks
        .departments
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.reports.expect_insert().times(0);
    mocks.evidence.expect_store().times(0);

    let err = mocks
        .into_service()
        .create(
            &citizen(),
            draft(Some(DepartmentId::random())),
            EvidenceUploads::default(),
        )
        .await
        .expect_err("unknown department");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn report_creation_without_a_department_skips_the_fan_out() {
    let mut mocks = Mocks::new();
    mocks.departments.expect_find_by_id().times(0);
    mocks.reports.expect_insert().times(1).return_once(|_| Ok(()));
    mocks.officers.expect_list_by_department().times(0);
    mocks.notifications.expect_insert_officer_batch().times(0);

    let report = mocks
        .into_service()
        .create(&citizen(), draft(None), EvidenceUploads::default())
        .await
        .expect("creation succeeds");
    assert!(report.department.is_none());
}

#[tokio::test]
async fn colliding_report_codes_are_regenerated() {
    let mut mocks = Mocks::new();
    let mut calls = 0_u32;
    mocks.reports.expect_insert().times(2).returning(move |report| {
        calls += 1;
        if calls == 1 {
            Err(ReportRepositoryError::duplicate_code(report.code.as_ref()))
        } else {
            Ok(())
        }
    });

    let report = mocks
        .into_service()
        .create(&citizen(), draft(None), EvidenceUploads::default())
        .await
        .expect("creation succeeds after retry");
    assert!(report.code.as_ref().starts_with("CR-"));
}

#[tokio::test]
async fn evidence_failures_abort_creation_before_the_row_is_written() {
    let mut mocks = Mocks::new();
    mocks
        .evidence
        .expect_store()
        .times(1)
        .return_once(|_| Err(crate::domain::ports::EvidenceStoreError::write("disk full")));
    mocks.reports.expect_insert().times(0);

    let uploads = EvidenceUploads {
        image: Some(
            EvidenceUpload::try_new(crate::domain::ports::EvidenceKind::Image, "png", vec![1])
                .expect("valid upload"),
        ),
        ..EvidenceUploads::default()
    };
    let err = mocks
        .into_service()
        .create(&citizen(), draft(None), uploads)
        .await
        .expect_err("evidence failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn same_status_posts_are_a_no_op_with_zero_notifications() {
    let report = stored_report(None, Some(UserId::random()), ReportStatus::Pending);
    let id = report.id;

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .with(eq(id))
        .times(1)
        .return_once(move |_| Ok(Some(report)));
    mocks.reports.expect_set_status().times(0);
    mocks.notifications.expect_insert_citizen().times(0);
    mocks.notifications.expect_insert_officer_batch().times(0);

    let outcome = mocks
        .into_service()
        .change_status(&admin(), &id, ReportStatus::Pending)
        .await
        .expect("no-op succeeds");
    assert!(!outcome.changed);
    assert_eq!(outcome.report.status, ReportStatus::Pending);
}

#[tokio::test]
async fn officers_resolving_a_case_notify_everyone_but_themselves() {
    let dept_id = DepartmentId::random();
    let reporter = UserId::random();
    let report = stored_report(Some(dept_id), Some(reporter), ReportStatus::Investigating);
    let id = report.id;
    let code = report.code.clone();

    let acting = officer_in(dept_id);
    let acting_id = acting.id;
    let members = vec![acting, officer_in(dept_id), officer_in(dept_id)];

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(report)));
    mocks
        .reports
        .expect_set_status()
        .with(eq(id), eq(ReportStatus::Resolved))
        .times(1)
        .return_once(|_, _| Ok(()));
    mocks
        .notifications
        .expect_insert_citizen()
        .withf(move |row: &NewCitizenNotification| {
            row.user == reporter
                && row.kind == CitizenNotificationKind::StatusUpdate
                && row.message.contains(code.as_ref())
                && row.message.contains("Resolved")
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .officers
        .expect_list_by_department()
        .with(eq(dept_id))
        .times(1)
        .return_once(move |_| Ok(members));
    mocks
        .notifications
        .expect_insert_officer_batch()
        .withf(move |batch: &[NewOfficerNotification]| {
            batch.len() == 2 && batch.iter().all(|row| row.officer != acting_id)
        })
        .times(1)
        .return_once(|_| Ok(()));

    let identity = Identity::Officer {
        user_id: UserId::random(),
        officer_id: acting_id,
        department: Some(dept_id),
    };
    let outcome = mocks
        .into_service()
        .change_status(&identity, &id, ReportStatus::Resolved)
        .await
        .expect("status change succeeds");
    assert!(outcome.changed);
    assert_eq!(outcome.report.status, ReportStatus::Resolved);
}

#[tokio::test]
async fn cross_department_officers_are_rejected_without_side_effects() {
    let report = stored_report(Some(DepartmentId::random()), None, ReportStatus::Pending);
    let id = report.id;

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(report)));
    mocks.reports.expect_set_status().times(0);
    mocks.notifications.expect_insert_citizen().times(0);
    mocks.notifications.expect_insert_officer_batch().times(0);

    let identity = Identity::Officer {
        user_id: UserId::random(),
        officer_id: OfficerId::random(),
        department: Some(DepartmentId::random()),
    };
    let err = mocks
        .into_service()
        .change_status(&identity, &id, ReportStatus::Resolved)
        .await
        .expect_err("cross-department change");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        err.details().and_then(|d| d["redirectTo"].as_str()),
        Some("/officer-board")
    );
}

#[tokio::test]
async fn reassignment_notifies_the_new_department_and_the_reporter() {
    let old_dept = department("North");
    let new_dept = department("South");
    let old_id = old_dept.id;
    let new_id = new_dept.id;
    let reporter = UserId::random();
    let report = stored_report(Some(old_id), Some(reporter), ReportStatus::Pending);
    let id = report.id;
    let members = vec![officer_in(new_id)];

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(report)));
    mocks
        .departments
        .expect_find_by_id()
        .with(eq(new_id))
        .times(1)
        .return_once(move |_| Ok(Some(new_dept)));
    mocks
        .departments
        .expect_find_by_id()
        .with(eq(old_id))
        .times(1)
        .return_once(move |_| Ok(Some(old_dept)));
    mocks
        .reports
        .expect_set_department()
        .with(eq(id), eq(new_id))
        .times(1)
        .return_once(|_, _| Ok(()));
    mocks
        .officers
        .expect_list_by_department()
        .with(eq(new_id))
        .times(1)
        .return_once(move |_| Ok(members));
    mocks
        .notifications
        .expect_insert_officer_batch()
        .withf(|batch: &[NewOfficerNotification]| {
            batch.len() == 1 && batch[0].message.starts_with("New case assigned:")
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_insert_citizen()
        .withf(move |row: &NewCitizenNotification| {
            row.user == reporter
                && row.kind == CitizenNotificationKind::Assignment
                && row.message.contains("from North to South")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let outcome = mocks
        .into_service()
        .reassign_department(&admin(), &id, new_id)
        .await
        .expect("reassignment succeeds");
    assert!(outcome.changed);
    assert_eq!(outcome.report.department, Some(new_id));
}

#[tokio::test]
async fn reassigning_to_the_current_department_is_a_no_op() {
    let dept = department("Central");
    let dept_id = dept.id;
    let report = stored_report(Some(dept_id), None, ReportStatus::Pending);
    let id = report.id;

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(report)));
    mocks
        .departments
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(dept)));
    mocks.reports.expect_set_department().times(0);
    mocks.notifications.expect_insert_officer_batch().times(0);
    mocks.notifications.expect_insert_citizen().times(0);

    let outcome = mocks
        .into_service()
        .reassign_department(&admin(), &id, dept_id)
        .await
        .expect("no-op succeeds");
    assert!(!outcome.changed);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn officers_cannot_reassign_departments(#[case] same_department: bool) {
    let dept_id = DepartmentId::random();
    let report_dept = if same_department {
        dept_id
    } else {
        DepartmentId::random()
    };
    let report = stored_report(Some(report_dept), None, ReportStatus::Pending);
    let id = report.id;

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(report)));
    mocks.reports.expect_set_department().times(0);

    let identity = Identity::Officer {
        user_id: UserId::random(),
        officer_id: OfficerId::random(),
        department: Some(dept_id),
    };
    let err = mocks
        .into_service()
        .reassign_department(&identity, &id, DepartmentId::random())
        .await
        .expect_err("officer reassignment");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn citizens_probing_foreign_reports_get_not_found() {
    let report = stored_report(None, Some(UserId::random()), ReportStatus::Pending);
    let id = report.id;

    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(report)));

    let err = mocks
        .into_service()
        .detail(&citizen(), &id)
        .await
        .expect_err("foreign report");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn unassigned_officers_see_an_empty_listing() {
    let mocks = Mocks::new();
    let identity = Identity::Officer {
        user_id: UserId::random(),
        officer_id: OfficerId::random(),
        department: None,
    };
    let reports = mocks
        .into_service()
        .department_list(&identity)
        .await
        .expect("listing succeeds");
    assert!(reports.is_empty());
}

#[tokio::test]
async fn dashboard_aggregates_counts_departments_and_recents() {
    let mut mocks = Mocks::new();
    mocks.reports.expect_status_counts().times(1).return_once(|_| {
        Ok(StatusCounts {
            total: 7,
            pending: 3,
            investigating: 2,
            resolved: 1,
            dismissed: 1,
        })
    });
    mocks.departments.expect_count().times(1).return_once(|| Ok(2));
    mocks
        .reports
        .expect_recent()
        .withf(|scope, limit| matches!(scope, ReportScope::All) && *limit == 5)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let dashboard = mocks
        .into_service()
        .dashboard(&admin())
        .await
        .expect("dashboard succeeds");
    assert_eq!(dashboard.counts.total, 7);
    assert_eq!(dashboard.departments, 2);
}

#[tokio::test]
async fn search_falls_back_to_the_listing_for_blank_queries() {
    let mut mocks = Mocks::new();
    mocks
        .reports
        .expect_list()
        .withf(|scope| matches!(scope, ReportScope::All))
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    mocks.reports.expect_search().times(0);

    mocks
        .into_service()
        .search(&admin(), "   ")
        .await
        .expect("search succeeds");
}
