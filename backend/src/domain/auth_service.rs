//! Registration, login, and per-request identity resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use zeroize::Zeroizing;

use super::error::Error;
use super::identity::Identity;
use super::ids::UserId;
use super::ports::{
    CredentialHasher, CredentialHasherError, NewUserRecord, OfficerRepository,
    OfficerRepositoryError, UserRepository, UserRepositoryError,
};
use super::user::{EmailAddress, EmailValidationError, Role, User};
use super::ApiResult;

/// Uniform message for login failures; never reveals which part failed.
const INVALID_CREDENTIALS: &str = "Invalid email or password.";
/// Message attached to requests without a usable session.
pub const LOGIN_REQUIRED: &str = "Please log in to continue.";
/// Landing route for unauthenticated callers.
pub const LOGIN_ROUTE: &str = "/my-login";

/// Maximum accepted name length.
pub const NAME_MAX: usize = 30;
/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors for self-registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// First name was empty or too long.
    BadFirstName,
    /// Last name was empty or too long.
    BadLastName,
    /// Email failed address validation.
    BadEmail(EmailValidationError),
    /// Phone was empty once trimmed.
    EmptyPhone,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort,
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl std::fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadFirstName => {
                write!(f, "first name must be 1-{NAME_MAX} characters")
            }
            Self::BadLastName => write!(f, "last name must be 1-{NAME_MAX} characters"),
            Self::BadEmail(inner) => write!(f, "{inner}"),
            Self::EmptyPhone => write!(f, "phone number must not be empty"),
            Self::PasswordTooShort => {
                write!(f, "password must be at least {PASSWORD_MIN} characters")
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

fn validate_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > NAME_MAX {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Validated citizen self-registration input.
///
/// Self-registration always produces a `citizen` account; officer and admin
/// accounts are provisioned by administrators.
#[derive(Debug, Clone)]
pub struct CitizenRegistration {
    /// Given name, trimmed.
    pub first_name: String,
    /// Family name, trimmed.
    pub last_name: String,
    /// Login email.
    pub email: EmailAddress,
    /// Contact number; unique across accounts.
    pub phone: String,
    /// Postal address.
    pub address: Option<String>,
    /// Plaintext password, zeroised on drop.
    pub password: Zeroizing<String>,
}

impl CitizenRegistration {
    /// Validate raw form input into a registration request.
    pub fn try_new(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: &str,
        address: Option<String>,
        password: &str,
        password_confirm: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let first_name =
            validate_name(first_name).ok_or(RegistrationValidationError::BadFirstName)?;
        let last_name =
            validate_name(last_name).ok_or(RegistrationValidationError::BadLastName)?;
        let email = EmailAddress::new(email).map_err(RegistrationValidationError::BadEmail)?;
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(RegistrationValidationError::EmptyPhone);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        if password != password_confirm {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        Ok(Self {
            first_name,
            last_name,
            email,
            phone: phone.to_owned(),
            address: address.filter(|a| !a.trim().is_empty()),
            password: Zeroizing::new(password.to_owned()),
        })
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::invalid_request("A user with this email already exists.")
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
        UserRepositoryError::DuplicatePhone { .. } => {
            Error::invalid_request("A user with this phone number already exists.")
                .with_details(json!({ "field": "phone", "code": "duplicate_phone" }))
        }
    }
}

fn map_officer_error(error: OfficerRepositoryError) -> Error {
    match error {
        OfficerRepositoryError::Connection { message } => Error::service_unavailable(message),
        OfficerRepositoryError::Query { message }
        | OfficerRepositoryError::DuplicateBadge { badge: message } => Error::internal(message),
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Error for requests whose session does not resolve to a live account.
fn login_required() -> Error {
    Error::unauthorized(LOGIN_REQUIRED).with_details(json!({ "redirectTo": LOGIN_ROUTE }))
}

/// Registration, authentication, and identity classification.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    officers: Arc<dyn OfficerRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthService {
    /// Create the service over its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        officers: Arc<dyn OfficerRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            officers,
            hasher,
        }
    }

    /// Create a citizen account from validated registration input.
    pub async fn register_citizen(&self, registration: CitizenRegistration) -> ApiResult<User> {
        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(map_hasher_error)?;
        let user = User {
            id: UserId::random(),
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            phone: Some(registration.phone),
            address: registration.address,
            role: Role::Citizen,
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        self.users
            .insert(&NewUserRecord {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }

    /// Validate credentials and classify the caller.
    ///
    /// Every failure path returns the same `unauthorized` message so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<(User, Identity)> {
        let Ok(email) = EmailAddress::new(email) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(stored) = self
            .users
            .find_for_login(&email)
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !stored.user.is_active {
            debug!(user = %stored.user.id, "login rejected for deactivated account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let matches = self
            .hasher
            .verify(password, &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let identity = self.classify(&stored.user).await?;
        Ok((stored.user, identity))
    }

    /// Resolve the identity behind a session user id.
    ///
    /// Stale sessions (deleted or deactivated accounts) are treated as
    /// unauthenticated rather than failing hard.
    pub async fn resolve_identity(&self, user_id: &UserId) -> ApiResult<Identity> {
        let Some(user) = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
        else {
            return Err(login_required());
        };
        if !user.is_active {
            return Err(login_required());
        }
        self.classify(&user).await
    }

    async fn classify(&self, user: &User) -> ApiResult<Identity> {
        let officer = if user.role == Role::Admin {
            None
        } else {
            self.officers
                .find_by_user_id(&user.id)
                .await
                .map_err(map_officer_error)?
        };
        Ok(Identity::from_parts(user, officer.as_ref()))
    }
}

#[cfg(test)]
mod tests;
