//! User account model and role tags.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::UserId;

/// Role tag assigned to an account at creation.
///
/// The role never changes after creation; it selects which capability set
/// the access guard checks the identity against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Super administrator: department management, officer provisioning,
    /// cross-department report control.
    Admin,
    /// Police officer with department-scoped visibility.
    Officer,
    /// Self-registered member of the public.
    Citizen,
}

impl Role {
    /// Database/text representation of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Officer => "officer",
            Self::Citizen => "citizen",
        }
    }

    /// Parse the text representation produced by [`Role::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "officer" => Some(Self::Officer),
            "citizen" => Some(Self::Citizen),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`EmailAddress::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    /// Input was empty once trimmed.
    Empty,
    /// Input did not look like `local@domain`.
    Malformed,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::Malformed => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Lower-cased, trimmed email address used as the login name.
///
/// ## Invariants
/// - non-empty once trimmed;
/// - contains exactly one `@` with non-empty local and domain parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ada@example.org")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        let mut parts = trimmed.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && domain.contains('.') => {
                Ok(Self(trimmed.to_lowercase()))
            }
            _ => Err(EmailValidationError::Malformed),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user account.
///
/// The stored credential hash never travels on this type; it stays inside
/// the persistence layer and the login path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number; unique when present.
    pub phone: Option<String>,
    /// Postal address, free text.
    pub address: Option<String>,
    /// Capability tag fixed at creation.
    pub role: Role,
    /// Suspended accounts cannot log in.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full name in `First Last` form, as shown in notification copy.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.org", "ada@example.org")]
    #[case("  Ada@Example.ORG  ", "ada@example.org")]
    fn email_addresses_are_normalised(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("no-at-sign", EmailValidationError::Malformed)]
    #[case("@example.org", EmailValidationError::Malformed)]
    #[case("two@@example.org", EmailValidationError::Malformed)]
    #[case("ada@nodot", EmailValidationError::Malformed)]
    fn invalid_email_addresses_are_rejected(
        #[case] input: &str,
        #[case] expected: EmailValidationError,
    ) {
        let err = EmailAddress::new(input).expect_err("invalid email");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(Role::Admin, "admin")]
    #[case(Role::Officer, "officer")]
    #[case(Role::Citizen, "citizen")]
    fn roles_round_trip_through_text(#[case] role: Role, #[case] text: &str) {
        assert_eq!(role.as_str(), text);
        assert_eq!(Role::parse(text), Some(role));
    }

    #[test]
    fn unknown_role_text_is_rejected() {
        assert_eq!(Role::parse("chief"), None);
    }
}
