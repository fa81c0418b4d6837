//! Police department directory entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::DepartmentId;

/// Organisational unit that reports are routed to.
///
/// Officers and reports reference departments with nullable links: removing
/// a department leaves both behind as unassigned rather than cascading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Stable identifier.
    pub id: DepartmentId,
    /// Unique department name.
    pub name: String,
    /// Physical location, free text.
    pub location: String,
    /// Front-desk contact number.
    pub contact_number: Option<String>,
    /// Date the department was established, when recorded.
    pub established_date: Option<NaiveDate>,
    /// Suspended departments stay in the directory but are flagged.
    pub is_active: bool,
}

/// Validation errors for department creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentValidationError {
    /// Name was empty once trimmed.
    EmptyName,
    /// Name exceeded the storage limit.
    NameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Location was empty once trimmed.
    EmptyLocation,
}

impl std::fmt::Display for DepartmentValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "department name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "department name must be at most {max} characters")
            }
            Self::EmptyLocation => write!(f, "department location must not be empty"),
        }
    }
}

impl std::error::Error for DepartmentValidationError {}

/// Maximum accepted department name length.
pub const DEPARTMENT_NAME_MAX: usize = 100;

/// Validated input for creating a department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    /// Unique department name, trimmed.
    pub name: String,
    /// Physical location, trimmed.
    pub location: String,
    /// Front-desk contact number.
    pub contact_number: Option<String>,
    /// Date the department was established.
    pub established_date: Option<NaiveDate>,
}

impl NewDepartment {
    /// Validate raw form input into a creation request.
    pub fn try_new(
        name: &str,
        location: &str,
        contact_number: Option<String>,
        established_date: Option<NaiveDate>,
    ) -> Result<Self, DepartmentValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        if name.chars().count() > DEPARTMENT_NAME_MAX {
            return Err(DepartmentValidationError::NameTooLong {
                max: DEPARTMENT_NAME_MAX,
            });
        }
        let location = location.trim();
        if location.is_empty() {
            return Err(DepartmentValidationError::EmptyLocation);
        }
        Ok(Self {
            name: name.to_owned(),
            location: location.to_owned(),
            contact_number: contact_number.filter(|number| !number.trim().is_empty()),
            established_date,
        })
    }

    /// Materialise the department with a fresh identifier.
    pub fn into_department(self) -> Department {
        Department {
            id: DepartmentId::random(),
            name: self.name,
            location: self.location,
            contact_number: self.contact_number,
            established_date: self.established_date,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_departments_start_active() {
        let department = NewDepartment::try_new("Central", "12 High Street", None, None)
            .expect("valid input")
            .into_department();
        assert!(department.is_active);
        assert_eq!(department.name, "Central");
    }

    #[rstest]
    #[case("", "somewhere", DepartmentValidationError::EmptyName)]
    #[case("   ", "somewhere", DepartmentValidationError::EmptyName)]
    #[case("Central", "  ", DepartmentValidationError::EmptyLocation)]
    fn blank_fields_are_rejected(
        #[case] name: &str,
        #[case] location: &str,
        #[case] expected: DepartmentValidationError,
    ) {
        let err = NewDepartment::try_new(name, location, None, None).expect_err("invalid input");
        assert_eq!(err, expected);
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "x".repeat(DEPARTMENT_NAME_MAX + 1);
        let err = NewDepartment::try_new(&name, "somewhere", None, None).expect_err("too long");
        assert_eq!(
            err,
            DepartmentValidationError::NameTooLong {
                max: DEPARTMENT_NAME_MAX
            }
        );
    }

    #[test]
    fn blank_contact_numbers_collapse_to_none() {
        let department = NewDepartment::try_new("Central", "12 High Street", Some("  ".into()), None)
            .expect("valid input");
        assert_eq!(department.contact_number, None);
    }
}
