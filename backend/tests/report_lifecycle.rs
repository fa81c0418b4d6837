//! End-to-end lifecycle scenarios over the HTTP surface: submission,
//! status changes, department reassignment, and their notification
//! fan-outs.

use actix_web::cookie::Cookie;
use actix_web::{test, App};
use serde_json::{json, Value};

use backend::domain::{CitizenNotificationKind, ReportStatus};
use backend::inbound::http::register_routes;
use backend::test_support::{test_app_state, test_session_middleware};

async fn login<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/my-login")
            .set_json(json!({ "email": email, "password": "password" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn report_body(department_id: Option<&str>) -> Value {
    let mut body = json!({
        "title": "Stolen bike",
        "description": "Taken overnight from the rack",
        "location": "Market Square",
        "incidentType": "THEFT",
    });
    if let Some(id) = department_id {
        body["departmentId"] = json!(id);
    }
    body
}

#[actix_web::test]
async fn citizen_submission_creates_a_pending_report_and_notifies_the_department() {
    let (state, store) = test_app_state();
    store.seed_citizen("ada@example.org", "password");
    let department = store.seed_department("Central");
    let (first, _) = store.seed_officer("o1@example.org", "password", "B-1", Some(department.id));
    let (second, _) = store.seed_officer("o2@example.org", "password", "B-2", Some(department.id));
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "ada@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/user-report")
            .cookie(cookie)
            .set_json(report_body(Some(&department.id.to_string())))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "Pending");
    let code = body["code"].as_str().expect("report code");
    assert!(code.starts_with("CR-"), "unexpected code: {code}");
    assert_eq!(code.len(), 11);

    for officer in [&first, &second] {
        let delivered = store.officer_notifications(&officer.id);
        assert_eq!(delivered.len(), 1, "each officer gets exactly one row");
        assert!(delivered[0].message.contains("Stolen bike"));
        assert!(!delivered[0].is_read);
    }
}

#[actix_web::test]
async fn officer_submissions_land_in_their_own_department() {
    let (state, store) = test_app_state();
    let own = store.seed_department("Central");
    let other = store.seed_department("North");
    store.seed_officer("officer@example.org", "password", "B-1", Some(own.id));
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "officer@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/add-report")
            .cookie(cookie)
            .set_json(report_body(Some(&other.id.to_string())))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["department"], json!(own.id.to_string()));
}

#[actix_web::test]
async fn resolving_a_case_notifies_the_reporter_and_every_other_department_officer() {
    let (state, store) = test_app_state();
    let department = store.seed_department("Central");
    let reporter = store.seed_citizen("ada@example.org", "password");
    let (acting, _) = store.seed_officer("o1@example.org", "password", "B-1", Some(department.id));
    let (other, _) = store.seed_officer("o2@example.org", "password", "B-2", Some(department.id));
    let (third, _) = store.seed_officer("o3@example.org", "password", "B-3", Some(department.id));
    let report = store.seed_report(
        Some(reporter.id),
        Some(department.id),
        ReportStatus::Investigating,
    );
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "o1@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({ "status": "Resolved" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());

    let stored = store.report(&report.id).expect("report still present");
    assert_eq!(stored.status, ReportStatus::Resolved);

    // Exactly one citizen notification for the reporter.
    let citizen_rows = store.citizen_notifications(&reporter.id);
    assert_eq!(citizen_rows.len(), 1);
    assert_eq!(citizen_rows[0].kind, CitizenNotificationKind::StatusUpdate);
    assert!(citizen_rows[0].message.contains("Resolved"));

    // N-1 officer rows: the acting officer is excluded.
    assert!(store.officer_notifications(&acting.id).is_empty());
    assert_eq!(store.officer_notifications(&other.id).len(), 1);
    assert_eq!(store.officer_notifications(&third.id).len(), 1);
}

#[actix_web::test]
async fn posting_the_current_status_changes_nothing_and_notifies_nobody() {
    let (state, store) = test_app_state();
    let department = store.seed_department("Central");
    let reporter = store.seed_citizen("ada@example.org", "password");
    let (officer, _) = store.seed_officer("o1@example.org", "password", "B-1", Some(department.id));
    let report = store.seed_report(Some(reporter.id), Some(department.id), ReportStatus::Pending);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "o1@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({ "status": "Pending" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "same-status post still succeeds");

    assert_eq!(
        store.report(&report.id).expect("report").status,
        ReportStatus::Pending
    );
    assert!(store.citizen_notifications(&reporter.id).is_empty());
    assert!(store.officer_notifications(&officer.id).is_empty());
}

#[actix_web::test]
async fn empty_statuses_are_validation_errors_and_are_not_applied() {
    let (state, store) = test_app_state();
    let department = store.seed_department("Central");
    store.seed_officer("o1@example.org", "password", "B-1", Some(department.id));
    let report = store.seed_report(None, Some(department.id), ReportStatus::Pending);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "o1@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({ "status": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
    assert_eq!(
        store.report(&report.id).expect("report").status,
        ReportStatus::Pending
    );
}

#[actix_web::test]
async fn officers_cannot_touch_another_departments_report() {
    let (state, store) = test_app_state();
    let own = store.seed_department("Central");
    let other = store.seed_department("North");
    store.seed_officer("o1@example.org", "password", "B-1", Some(own.id));
    let report = store.seed_report(None, Some(other.id), ReportStatus::Pending);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "o1@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({ "status": "Resolved" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["redirectTo"], "/officer-board");

    assert_eq!(
        store.report(&report.id).expect("report").status,
        ReportStatus::Pending,
        "rejected change must not mutate the report"
    );
}

#[actix_web::test]
async fn admin_reassignment_moves_the_report_and_notifies_both_sides() {
    let (state, store) = test_app_state();
    let first = store.seed_department("North");
    let second = store.seed_department("South");
    store.seed_admin("admin@example.org", "password");
    let reporter = store.seed_citizen("ada@example.org", "password");
    let (old_officer, _) = store.seed_officer("o1@example.org", "password", "B-1", Some(first.id));
    let (new_officer, _) = store.seed_officer("o2@example.org", "password", "B-2", Some(second.id));
    let report = store.seed_report(Some(reporter.id), Some(first.id), ReportStatus::Pending);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "admin@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-report-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({ "departmentId": second.id.to_string() }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["department"], json!(second.id.to_string()));

    // Destination officers are notified; the old department is not.
    assert_eq!(store.officer_notifications(&new_officer.id).len(), 1);
    assert!(store.officer_notifications(&old_officer.id).is_empty());

    let citizen_rows = store.citizen_notifications(&reporter.id);
    assert_eq!(citizen_rows.len(), 1);
    assert_eq!(citizen_rows[0].kind, CitizenNotificationKind::Assignment);
    assert!(citizen_rows[0].message.contains("North"));
    assert!(citizen_rows[0].message.contains("South"));
}

#[actix_web::test]
async fn admin_can_change_status_and_reassign_in_one_post() {
    let (state, store) = test_app_state();
    let first = store.seed_department("North");
    let second = store.seed_department("South");
    store.seed_admin("admin@example.org", "password");
    let report = store.seed_report(None, Some(first.id), ReportStatus::Pending);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "admin@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-report-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({
                "status": "Investigating",
                "departmentId": second.id.to_string(),
            }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());

    let stored = store.report(&report.id).expect("report");
    assert_eq!(stored.status, ReportStatus::Investigating);
    assert_eq!(stored.department, Some(second.id));
}

#[actix_web::test]
async fn posting_neither_status_nor_department_is_a_validation_error() {
    let (state, store) = test_app_state();
    store.seed_admin("admin@example.org", "password");
    let report = store.seed_report(None, None, ReportStatus::Pending);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "admin@example.org").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/update-report-status/{}", report.id))
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn evidence_uploads_are_stored_and_referenced() {
    let (state, store) = test_app_state();
    store.seed_citizen("ada@example.org", "password");
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .configure(register_routes),
    )
    .await;

    let cookie = login(&app, "ada@example.org").await;
    let mut body = report_body(None);
    body["evidenceImage"] = json!({ "data": "data:image/png;base64,AQID", "extension": "png" });
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/user-report")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    let payload: Value = test::read_body_json(res).await;
    let path = payload["evidence"]["image"].as_str().expect("evidence path");
    assert!(path.starts_with("evidence/images/"), "unexpected path: {path}");
    assert!(path.ends_with(".png"));
}
