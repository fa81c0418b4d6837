//! Resolved caller identity.
//!
//! The access guard consumes an explicit tagged variant instead of probing
//! for an officer profile at every call site, so its rules stay exhaustive
//! and statically checkable. The admin role wins over an officer profile if
//! an account somehow carries both.

use serde::Serialize;

use super::ids::{DepartmentId, OfficerId, UserId};
use super::officer::Officer;
use super::user::{Role, User};

/// Authenticated caller, classified once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Identity {
    /// Super administrator.
    Admin {
        /// Backing user account.
        user_id: UserId,
    },
    /// Officer, scoped to their current department.
    Officer {
        /// Backing user account.
        user_id: UserId,
        /// Officer profile.
        officer_id: OfficerId,
        /// Current department; `None` when unassigned.
        department: Option<DepartmentId>,
    },
    /// Authenticated member of the public.
    Citizen {
        /// Backing user account.
        user_id: UserId,
    },
}

impl Identity {
    /// Classify a user account and optional officer profile.
    pub fn from_parts(user: &User, officer: Option<&Officer>) -> Self {
        if user.role == Role::Admin {
            return Self::Admin { user_id: user.id };
        }
        match officer {
            Some(profile) => Self::Officer {
                user_id: user.id,
                officer_id: profile.id,
                department: profile.department,
            },
            None => Self::Citizen { user_id: user.id },
        }
    }

    /// Backing user account id.
    pub const fn user_id(&self) -> &UserId {
        match self {
            Self::Admin { user_id }
            | Self::Officer { user_id, .. }
            | Self::Citizen { user_id } => user_id,
        }
    }

    /// Landing page for this identity's role, used in every rejection and
    /// after login.
    pub const fn landing_route(&self) -> &'static str {
        match self {
            Self::Admin { .. } => "/dashboard",
            Self::Officer { .. } => "/officer-board",
            Self::Citizen { .. } => "/user-board",
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;

    use super::*;
    use crate::domain::officer::{BadgeNumber, Rank};
    use crate::domain::user::EmailAddress;

    fn user(role: Role) -> User {
        User {
            id: UserId::random(),
            email: EmailAddress::new("ada@example.org").expect("valid email"),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: None,
            address: None,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn officer_profile(user_id: UserId, department: Option<DepartmentId>) -> Officer {
        Officer {
            id: OfficerId::random(),
            user_id,
            rank: Rank::Sp,
            badge_number: BadgeNumber::new("B-1").expect("valid badge"),
            department,
            on_duty: true,
        }
    }

    #[test]
    fn admin_role_wins_over_an_officer_profile() {
        let account = user(Role::Admin);
        let profile = officer_profile(account.id, None);
        let identity = Identity::from_parts(&account, Some(&profile));
        assert!(matches!(identity, Identity::Admin { .. }));
        assert_eq!(identity.landing_route(), "/dashboard");
    }

    #[test]
    fn officer_profile_carries_its_department() {
        let account = user(Role::Officer);
        let department = DepartmentId::random();
        let profile = officer_profile(account.id, Some(department));
        let identity = Identity::from_parts(&account, Some(&profile));
        match identity {
            Identity::Officer {
                department: dept, ..
            } => assert_eq!(dept, Some(department)),
            other => panic!("expected officer identity, got {other:?}"),
        }
    }

    #[test]
    fn plain_accounts_classify_as_citizens() {
        let account = user(Role::Citizen);
        let identity = Identity::from_parts(&account, None);
        assert!(matches!(identity, Identity::Citizen { .. }));
        assert_eq!(identity.landing_route(), "/user-board");
    }
}
