//! Strongly typed entity identifiers.
//!
//! Every aggregate gets its own UUID-backed id newtype so a report id can
//! never be passed where an officer id is expected. The wrappers serialise
//! as plain UUID strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_entity_id {
    (
        $(#[$outer:meta])*
        $name:ident
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_entity_id! {
    /// Stable user identifier.
    UserId
}

define_entity_id! {
    /// Identifier of an officer profile (distinct from the backing user id).
    OfficerId
}

define_entity_id! {
    /// Department identifier.
    DepartmentId
}

define_entity_id! {
    /// Internal crime report identifier. The human-facing identity is the
    /// report code, not this value.
    ReportId
}

define_entity_id! {
    /// Identifier shared by officer and citizen notification rows.
    NotificationId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_serde_as_plain_uuids() {
        let id = ReportId::random();
        let json = serde_json::to_string(&id).expect("serialise id");
        assert_eq!(json, format!("\"{id}\""));
        let back: ReportId = serde_json::from_str(&json).expect("deserialise id");
        assert_eq!(back, id);
    }

    #[test]
    fn random_ids_do_not_collide() {
        assert_ne!(UserId::random(), UserId::random());
    }
}
