//! Users and the closed role set consumed by the authorization gate.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::id::UserId;

/// The three roles. A user holds exactly one, fixed for the session; role
/// changes are an administrative operation outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Requester,
    Agent,
    Admin,
}

impl Role {
    /// All roles, in escalating order of capability.
    pub const ALL: [Self; 3] = [Self::Requester, Self::Agent, Self::Admin];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Requester => "requester",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = super::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "requester" => Ok(Self::Requester),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            _ => Err(super::ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

/// An authenticated user as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub role: Role,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, User, UserId};
    use std::str::FromStr;

    #[test]
    fn role_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&Role::Requester).expect("serialize"),
            "\"requester\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"admin\"").expect("deserialize"),
            Role::Admin
        );
    }

    #[test]
    fn role_display_parse_roundtrips() {
        for role in Role::ALL {
            let rendered = role.to_string();
            assert_eq!(Role::from_str(&rendered).expect("reparse"), role);
        }
    }

    #[test]
    fn role_parse_rejects_unknown() {
        assert!(Role::from_str("superuser").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn user_carries_one_role() {
        let user = User::new(UserId::new_unchecked("u-1"), "Ada", Role::Agent);
        assert_eq!(user.role, Role::Agent);
        assert_eq!(user.display_name, "Ada");
    }
}
