use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Hours a freshly issued token stays valid.
pub const TOKEN_LIFETIME_HOURS: i64 = 3;

/// Role granted to an authenticated identity.
///
/// Only one role exists; it is carried in every token so the boundary can
/// enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username the token was issued to)
    pub sub: String,

    /// Stable identifier of the account; survives renames of `sub`
    pub uid: String,

    /// Role granted to the subject
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an authenticated user.
    ///
    /// # Arguments
    /// * `user_id` - Account identifier stored in `uid`
    /// * `username` - Username stored as the subject
    /// * `role` - Role granted to the user
    /// * `issued_at` - Issue instant; expiry is `issued_at` plus the token lifetime
    pub fn for_user(
        user_id: impl ToString,
        username: impl ToString,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expiration = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            sub: username.to_string(),
            uid: user_id.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Absolute expiry as a UTC timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let issued_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let claims = Claims::for_user("user-1", "alice1234", Role::User, issued_at);

        assert_eq!(claims.sub, "alice1234");
        assert_eq!(claims.uid, "user-1");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 3 * 60 * 60);
        assert_eq!(
            claims.expires_at(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_role_serializes_as_name() {
        let value = serde_json::to_value(Role::User).unwrap();
        assert_eq!(value, serde_json::json!("User"));
        assert_eq!(Role::User.to_string(), "User");
    }

    #[test]
    fn test_claims_wire_format() {
        let issued_at = Utc.timestamp_opt(1_000, 0).unwrap();
        let claims = Claims::for_user("user-1", "alice1234", Role::User, issued_at);

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sub": "alice1234",
                "uid": "user-1",
                "role": "User",
                "iat": 1_000,
                "exp": 1_000 + 3 * 60 * 60,
            })
        );
    }
}
