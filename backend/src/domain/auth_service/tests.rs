//! Regression coverage for registration and login.

use chrono::Utc;
use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ids::OfficerId;
use crate::domain::officer::{BadgeNumber, Officer, Rank};
use crate::domain::ports::{
    MockCredentialHasher, MockOfficerRepository, MockUserRepository, StoredCredentials,
};
use crate::domain::ErrorCode;

fn registration() -> CitizenRegistration {
    CitizenRegistration::try_new(
        "Ada",
        "Lovelace",
        "ada@example.org",
        "0123456789",
        None,
        "correct horse",
        "correct horse",
    )
    .expect("valid registration")
}

fn stored_user(role: Role, active: bool) -> User {
    User {
        id: UserId::random(),
        email: EmailAddress::new("ada@example.org").expect("valid email"),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        phone: Some("0123456789".into()),
        address: None,
        role,
        is_active: active,
        created_at: Utc::now(),
    }
}

fn service(
    users: MockUserRepository,
    officers: MockOfficerRepository,
    hasher: MockCredentialHasher,
) -> AuthService {
    AuthService::new(Arc::new(users), Arc::new(officers), Arc::new(hasher))
}

#[rstest]
#[case("", "Lovelace", RegistrationValidationError::BadFirstName)]
#[case("Ada", "   ", RegistrationValidationError::BadLastName)]
fn registration_rejects_blank_names(
    #[case] first: &str,
    #[case] last: &str,
    #[case] expected: RegistrationValidationError,
) {
    let err = CitizenRegistration::try_new(
        first,
        last,
        "ada@example.org",
        "0123456789",
        None,
        "correct horse",
        "correct horse",
    )
    .expect_err("invalid input");
    assert_eq!(err, expected);
}

#[test]
fn registration_rejects_short_passwords() {
    let err = CitizenRegistration::try_new(
        "Ada",
        "Lovelace",
        "ada@example.org",
        "0123456789",
        None,
        "short",
        "short",
    )
    .expect_err("short password");
    assert_eq!(err, RegistrationValidationError::PasswordTooShort);
}

#[test]
fn registration_rejects_mismatched_passwords() {
    let err = CitizenRegistration::try_new(
        "Ada",
        "Lovelace",
        "ada@example.org",
        "0123456789",
        None,
        "correct horse",
        "battery staple",
    )
    .expect_err("mismatch");
    assert_eq!(err, RegistrationValidationError::PasswordMismatch);
}

#[tokio::test]
async fn register_citizen_hashes_and_persists() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|record: &NewUserRecord| {
            record.user.role == Role::Citizen && record.password_hash == "hashed"
        })
        .times(1)
        .return_once(|_| Ok(()));
    let mut hasher = MockCredentialHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok("hashed".into()));

    let auth = service(users, MockOfficerRepository::new(), hasher);
    let user = auth
        .register_citizen(registration())
        .await
        .expect("registration succeeds");
    assert_eq!(user.role, Role::Citizen);
    assert!(user.is_active);
}

#[tokio::test]
async fn duplicate_email_maps_to_a_field_validation_error() {
    let mut users = MockUserRepository::new();
    users.expect_insert().times(1).return_once(|_| {
        Err(UserRepositoryError::duplicate_email("ada@example.org"))
    });
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hashed".into()));

    let auth = service(users, MockOfficerRepository::new(), hasher);
    let err = auth
        .register_citizen(registration())
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d["field"].as_str()),
        Some("email")
    );
}

#[tokio::test]
async fn authenticate_classifies_officers_with_their_department() {
    let user = stored_user(Role::Officer, true);
    let user_id = user.id;
    let department = crate::domain::ids::DepartmentId::random();
    let profile = Officer {
        id: OfficerId::random(),
        user_id,
        rank: Rank::Sp,
        badge_number: BadgeNumber::new("B-1").expect("valid badge"),
        department: Some(department),
        on_duty: true,
    };

    let mut users = MockUserRepository::new();
    let stored = StoredCredentials {
        user,
        password_hash: "stored-hash".into(),
    };
    users
        .expect_find_for_login()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    let mut officers = MockOfficerRepository::new();
    officers
        .expect_find_by_user_id()
        .with(eq(user_id))
        .times(1)
        .return_once(move |_| Ok(Some(profile)));
    let mut hasher = MockCredentialHasher::new();
    hasher.expect_verify().times(1).return_once(|_, _| Ok(true));

    let auth = service(users, officers, hasher);
    let (_, identity) = auth
        .authenticate("ada@example.org", "pw")
        .await
        .expect("login succeeds");
    match identity {
        Identity::Officer {
            department: dept, ..
        } => assert_eq!(dept, Some(department)),
        other => panic!("expected officer identity, got {other:?}"),
    }
}

#[rstest]
#[case(false, true)] // unknown account
#[case(true, false)] // wrong password
#[tokio::test]
async fn authenticate_rejects_bad_credentials_uniformly(
    #[case] account_exists: bool,
    #[case] password_matches: bool,
) {
    let mut users = MockUserRepository::new();
    if account_exists {
        let stored = StoredCredentials {
            user: stored_user(Role::Citizen, true),
            password_hash: "stored-hash".into(),
        };
        users
            .expect_find_for_login()
            .return_once(move |_| Ok(Some(stored)));
    } else {
        users.expect_find_for_login().return_once(|_| Ok(None));
    }
    let mut hasher = MockCredentialHasher::new();
    if account_exists {
        hasher
            .expect_verify()
            .return_once(move |_, _| Ok(password_matches));
    }

    let auth = service(users, MockOfficerRepository::new(), hasher);
    let err = auth
        .authenticate("ada@example.org", "pw")
        .await
        .expect_err("login fails");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Invalid email or password.");
}

#[tokio::test]
async fn deactivated_accounts_cannot_log_in() {
    let mut users = MockUserRepository::new();
    let stored = StoredCredentials {
        user: stored_user(Role::Citizen, false),
        password_hash: "stored-hash".into(),
    };
    users
        .expect_find_for_login()
        .return_once(move |_| Ok(Some(stored)));

    let auth = service(
        users,
        MockOfficerRepository::new(),
        MockCredentialHasher::new(),
    );
    let err = auth
        .authenticate("ada@example.org", "pw")
        .await
        .expect_err("login fails");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn stale_sessions_resolve_to_login_required() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let auth = service(
        users,
        MockOfficerRepository::new(),
        MockCredentialHasher::new(),
    );
    let err = auth
        .resolve_identity(&UserId::random())
        .await
        .expect_err("stale session");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(
        err.details().and_then(|d| d["redirectTo"].as_str()),
        Some("/my-login")
    );
}

#[tokio::test]
async fn admin_accounts_skip_the_officer_lookup() {
    let user = stored_user(Role::Admin, true);
    let user_id = user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(user_id))
        .return_once(move |_| Ok(Some(user)));
    let mut officers = MockOfficerRepository::new();
    officers.expect_find_by_user_id().times(0);

    let auth = service(users, officers, MockCredentialHasher::new());
    let identity = auth
        .resolve_identity(&user_id)
        .await
        .expect("identity resolves");
    assert!(matches!(identity, Identity::Admin { .. }));
}
