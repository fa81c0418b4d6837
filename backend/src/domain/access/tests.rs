//! Regression coverage for the access guard.

use rstest::rstest;

use super::*;
use crate::domain::ids::{DepartmentId, OfficerId, ReportId, UserId};
use crate::domain::report::{
    CrimeReport, EvidenceRefs, IncidentType, Priority, ReportCode, ReportStatus,
};

fn admin() -> Identity {
    Identity::Admin {
        user_id: UserId::random(),
    }
}

fn officer(department: Option<DepartmentId>) -> Identity {
    Identity::Officer {
        user_id: UserId::random(),
        officer_id: OfficerId::random(),
        department,
    }
}

fn citizen() -> Identity {
    Identity::Citizen {
        user_id: UserId::random(),
    }
}

fn report(department: Option<DepartmentId>, reporter: Option<UserId>) -> CrimeReport {
    let now = chrono::Utc::now();
    CrimeReport {
        id: ReportId::random(),
        code: ReportCode::generate(),
        reporter,
        department,
        title: "Stolen bike".into(),
        description: "Taken overnight".into(),
        location: "Market Square".into(),
        coordinates: None,
        incident_type: IncidentType::Theft,
        priority: Priority::Medium,
        status: ReportStatus::Pending,
        evidence: EvidenceRefs::default(),
        reported_at: now,
        updated_at: now,
    }
}

#[rstest]
#[case(Action::ViewDashboard)]
#[case(Action::ManageDepartments)]
#[case(Action::ProvisionOfficers)]
#[case(Action::ListAllReports)]
#[case(Action::ReassignDepartment)]
#[case(Action::SearchReports)]
fn admins_may_perform_admin_actions(#[case] action: Action) {
    assert!(decide(&admin(), action, None).is_ok());
}

#[test]
fn admins_may_change_status_on_any_report() {
    let target = report(Some(DepartmentId::random()), None);
    assert!(decide(&admin(), Action::ChangeStatus, Some(&target)).is_ok());
}

#[rstest]
#[case(Action::ViewOfficerBoard)]
#[case(Action::ViewCitizenBoard)]
#[case(Action::SubmitReport)]
fn admins_are_denied_role_boards(#[case] action: Action) {
    let denied = decide(&admin(), action, None).expect_err("admin denied");
    assert_eq!(denied.landing, "/dashboard");
}

#[test]
fn officers_may_act_within_their_department() {
    let department = DepartmentId::random();
    let identity = officer(Some(department));
    let target = report(Some(department), None);
    assert!(decide(&identity, Action::ViewReport, Some(&target)).is_ok());
    assert!(decide(&identity, Action::ChangeStatus, Some(&target)).is_ok());
}

#[test]
fn officers_are_denied_reports_from_other_departments() {
    let identity = officer(Some(DepartmentId::random()));
    let target = report(Some(DepartmentId::random()), None);
    let denied = decide(&identity, Action::ChangeStatus, Some(&target)).expect_err("cross dept");
    assert_eq!(denied.landing, "/officer-board");
    assert_eq!(denied.message, "This report belongs to another department.");
}

#[test]
fn unassigned_officers_are_denied_report_access() {
    let identity = officer(None);
    let target = report(None, None);
    assert!(decide(&identity, Action::ViewReport, Some(&target)).is_err());
}

#[rstest]
#[case(Action::ReassignDepartment)]
#[case(Action::ViewDashboard)]
#[case(Action::ManageDepartments)]
fn officers_are_denied_admin_actions(#[case] action: Action) {
    let denied = decide(&officer(Some(DepartmentId::random())), action, None)
        .expect_err("officer denied");
    assert_eq!(denied.landing, "/officer-board");
}

#[test]
fn citizens_may_view_only_their_own_reports() {
    let identity = citizen();
    let Identity::Citizen { user_id } = identity.clone() else {
        panic!("expected citizen identity");
    };
    let own = report(None, Some(user_id));
    assert!(decide(&identity, Action::ViewReport, Some(&own)).is_ok());

    let foreign = report(None, Some(UserId::random()));
    let denied = decide(&identity, Action::ViewReport, Some(&foreign)).expect_err("foreign");
    assert_eq!(denied.landing, "/user-board");
}

#[rstest]
#[case(Action::ChangeStatus)]
#[case(Action::SearchReports)]
#[case(Action::ViewOfficerBoard)]
#[case(Action::ReassignDepartment)]
fn citizens_are_denied_privileged_actions(#[case] action: Action) {
    let denied = decide(&citizen(), action, None).expect_err("citizen denied");
    assert_eq!(denied.landing, "/user-board");
}

#[test]
fn denials_convert_to_forbidden_errors_with_redirects() {
    let denied = decide(&citizen(), Action::ChangeStatus, None).expect_err("denied");
    let error: crate::domain::Error = denied.into();
    assert_eq!(error.code(), crate::domain::ErrorCode::Forbidden);
    let details = error.details().expect("details present");
    assert_eq!(details["redirectTo"], "/user-board");
}
