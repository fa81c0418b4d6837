//! Port abstraction for user account persistence.

use async_trait::async_trait;

use crate::domain::ids::UserId;
use crate::domain::user::{EmailAddress, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// Another account already uses this phone number.
        DuplicatePhone { phone: String } => "phone number already registered: {phone}",
    }
}

/// A new account together with its credential hash.
///
/// The hash only exists on this write-side type and on
/// [`StoredCredentials`]; the domain [`User`] never carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    /// Account fields to persist.
    pub user: User,
    /// Argon2 PHC-format credential hash.
    pub password_hash: String,
}

/// Read-side pairing of an account and its stored credential hash, used
/// only by the login path.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCredentials {
    /// The stored account.
    pub user: User,
    /// Argon2 PHC-format credential hash.
    pub password_hash: String,
}

/// Port for user account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account.
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account and its credential hash by login email.
    async fn find_for_login(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;
}
