//! Port abstraction for credential hashing.
//!
//! Named `CredentialHasher` rather than `PasswordHasher` to avoid clashing
//! with the `argon2` trait of that name in the adapter.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum CredentialHasherError {
        /// Hash computation failed.
        Hash { message: String } => "credential hashing failed: {message}",
        /// The stored hash could not be parsed for verification.
        Verify { message: String } => "credential verification failed: {message}",
    }
}

/// Port for hashing and verifying login credentials.
///
/// Hashing is CPU-bound rather than I/O-bound, so the trait is synchronous.
/// A mismatched password is `Ok(false)`, not an error; errors are reserved
/// for malformed stored hashes and hasher failures.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into PHC string format.
    fn hash(&self, password: &str) -> Result<String, CredentialHasherError>;

    /// Verify a plaintext password against a stored PHC-format hash.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialHasherError>;
}
