//! Officer profiles: rank, badge, and department affiliation.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{DepartmentId, OfficerId, UserId};

/// Police ranks, ordered roughly by seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rank {
    /// Assistant Superintendent of Police.
    Asp,
    /// Deputy Superintendent of Police.
    Dsp,
    /// Superintendent of Police.
    Sp,
    /// Chief Superintendent of Police.
    Csp,
    /// Assistant Commissioner of Police.
    Acp,
    /// Deputy Commissioner of Police.
    Dcp,
    /// Commissioner of Police.
    Cp,
}

impl Rank {
    /// Short code stored in the database and shown in listings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asp => "ASP",
            Self::Dsp => "DSP",
            Self::Sp => "SP",
            Self::Csp => "CSP",
            Self::Acp => "ACP",
            Self::Dcp => "DCP",
            Self::Cp => "CP",
        }
    }

    /// Full rank title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Asp => "Assistant Superintendent of Police",
            Self::Dsp => "Deputy Superintendent of Police",
            Self::Sp => "Superintendent of Police",
            Self::Csp => "Chief Superintendent of Police",
            Self::Acp => "Assistant Commissioner of Police",
            Self::Dcp => "Deputy Commissioner of Police",
            Self::Cp => "Commissioner of Police",
        }
    }

    /// Parse the short code produced by [`Rank::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ASP" => Some(Self::Asp),
            "DSP" => Some(Self::Dsp),
            "SP" => Some(Self::Sp),
            "CSP" => Some(Self::Csp),
            "ACP" => Some(Self::Acp),
            "DCP" => Some(Self::Dcp),
            "CP" => Some(Self::Cp),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`BadgeNumber::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeValidationError {
    /// Input was empty once trimmed.
    Empty,
    /// Input exceeded the storage limit.
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl fmt::Display for BadgeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "badge number must not be empty"),
            Self::TooLong { max } => write!(f, "badge number must be at most {max} characters"),
        }
    }
}

impl std::error::Error for BadgeValidationError {}

/// Maximum accepted badge number length.
pub const BADGE_NUMBER_MAX: usize = 30;

/// Unique badge number issued to an officer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "B-1042")]
pub struct BadgeNumber(String);

impl BadgeNumber {
    /// Validate and construct a badge number from raw input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, BadgeValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BadgeValidationError::Empty);
        }
        if trimmed.chars().count() > BADGE_NUMBER_MAX {
            return Err(BadgeValidationError::TooLong {
                max: BADGE_NUMBER_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BadgeNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BadgeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<BadgeNumber> for String {
    fn from(value: BadgeNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for BadgeNumber {
    type Error = BadgeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Officer profile owned one-to-one by a [`super::User`] account.
///
/// Created only through admin provisioning, which also creates the backing
/// user; deleting the user cascades to this profile. The department link is
/// nullable: an officer may be unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    /// Stable profile identifier.
    pub id: OfficerId,
    /// Backing user account.
    pub user_id: UserId,
    /// Current rank.
    pub rank: Rank,
    /// Unique badge number.
    pub badge_number: BadgeNumber,
    /// Department assignment; `None` when unassigned.
    pub department: Option<DepartmentId>,
    /// Whether the officer is currently on duty.
    pub on_duty: bool,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rank::Asp, "ASP")]
    #[case(Rank::Dsp, "DSP")]
    #[case(Rank::Sp, "SP")]
    #[case(Rank::Csp, "CSP")]
    #[case(Rank::Acp, "ACP")]
    #[case(Rank::Dcp, "DCP")]
    #[case(Rank::Cp, "CP")]
    fn ranks_round_trip_through_text(#[case] rank: Rank, #[case] code: &str) {
        assert_eq!(rank.as_str(), code);
        assert_eq!(Rank::parse(code), Some(rank));
    }

    #[test]
    fn rank_titles_expand_the_code() {
        assert_eq!(Rank::Cp.title(), "Commissioner of Police");
    }

    #[rstest]
    #[case("  B-1042  ", "B-1042")]
    #[case("7", "7")]
    fn badge_numbers_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let badge = BadgeNumber::new(input).expect("valid badge");
        assert_eq!(badge.as_ref(), expected);
    }

    #[test]
    fn blank_badge_numbers_are_rejected() {
        assert_eq!(
            BadgeNumber::new("   ").expect_err("blank badge"),
            BadgeValidationError::Empty
        );
    }

    #[test]
    fn overlong_badge_numbers_are_rejected() {
        let input = "9".repeat(BADGE_NUMBER_MAX + 1);
        assert_eq!(
            BadgeNumber::new(input).expect_err("overlong badge"),
            BadgeValidationError::TooLong {
                max: BADGE_NUMBER_MAX
            }
        );
    }
}
