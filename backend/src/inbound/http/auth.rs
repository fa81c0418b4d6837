//! Public authentication endpoints: registration, login, logout.
//!
//! ```text
//! POST /register {"firstName":"Ada","lastName":"Lovelace","email":"ada@example.org", ...}
//! POST /my-login {"email":"ada@example.org","password":"..."}
//! POST /logout
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::auth_service::LOGIN_ROUTE;
use crate::domain::{
    CitizenRegistration, Error, RegistrationValidationError, UserId,
};

use super::dto::field_error;
use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

/// Registration body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Chosen password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub password_confirm: String,
}

/// Successful registration response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Identifier of the new account.
    pub id: UserId,
    /// Where the client should send the user next.
    pub redirect_to: String,
}

/// Login body for `POST /my-login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Successful login response: where the actor's role lands.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Role landing route: `/dashboard`, `/officer-board`, or `/user-board`.
    pub redirect_to: String,
}

fn map_registration_error(error: RegistrationValidationError) -> Error {
    let field = match &error {
        RegistrationValidationError::BadFirstName => "firstName",
        RegistrationValidationError::BadLastName => "lastName",
        RegistrationValidationError::BadEmail(_) => "email",
        RegistrationValidationError::EmptyPhone => "phone",
        RegistrationValidationError::PasswordTooShort
        | RegistrationValidationError::PasswordMismatch => "password",
    };
    field_error(error.to_string(), field, "invalid")
}

/// Create a citizen account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid registration input", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = CitizenRegistration::try_new(
        &body.first_name,
        &body.last_name,
        &body.email,
        &body.phone,
        body.address,
        &body.password,
        &body.password_confirm,
    )
    .map_err(map_registration_error)?;
    let user = state.auth.register_citizen(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        id: user.id,
        redirect_to: LOGIN_ROUTE.to_owned(),
    }))
}

/// Authenticate and establish a session; the response carries the landing
/// route for the actor's role.
#[utoipa::path(
    post,
    path = "/my-login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/my-login")]
pub async fn my_login(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let (user, identity) = state
        .auth
        .authenticate(&payload.email, &payload.password)
        .await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(LoginResponse {
        redirect_to: identity.landing_route().to_owned(),
    }))
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Session cleared", body = LoginResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> web::Json<LoginResponse> {
    session.clear();
    web::Json(LoginResponse {
        redirect_to: LOGIN_ROUTE.to_owned(),
    })
}
