use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role a signed-in user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Teacher,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire role value is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "parent" => Ok(Role::Parent),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The signed-in user record held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Partial update applied to the current identity. Fields left as `None`
/// keep their current value; the credential token is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl IdentityPatch {
    pub fn apply(&self, identity: &mut Identity) {
        if let Some(name) = &self.name {
            identity.name = name.clone();
        }
        if let Some(email) = &self.email {
            identity.email = email.clone();
        }
    }
}

/// Lifecycle state of the authentication session.
///
/// `RestoreFailed` means the persistent store could not be read or held a
/// corrupt record; every authorization query treats it the same as
/// `Unauthenticated`, and a fresh login is permitted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Uninitialized,
    Restoring,
    Unauthenticated,
    Authenticating,
    Authenticated,
    RestoreFailed,
}

impl SessionStatus {
    /// Whether the session currently carries a usable identity and token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }
}

/// What session observers see. Identity is present iff the status is
/// `Authenticated`; `last_error` holds the most recent login or expiry
/// message until it is explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub identity: Option<Identity>,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }

    /// Role of the signed-in user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Parent, Role::Teacher, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "principal".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("principal".to_string()));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), r#""parent""#);
    }

    #[test]
    fn test_identity_patch_merges_only_given_fields() {
        let mut identity = Identity {
            id: "u1".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Parent,
        };
        let patch = IdentityPatch {
            name: Some("Alice".to_string()),
            email: None,
        };
        patch.apply(&mut identity);
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.role, Role::Parent);
    }

    #[test]
    fn test_only_authenticated_counts_as_signed_in() {
        assert!(SessionStatus::Authenticated.is_authenticated());
        for status in [
            SessionStatus::Uninitialized,
            SessionStatus::Restoring,
            SessionStatus::Unauthenticated,
            SessionStatus::Authenticating,
            SessionStatus::RestoreFailed,
        ] {
            assert!(!status.is_authenticated());
        }
    }
}
