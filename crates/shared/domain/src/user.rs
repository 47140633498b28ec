//! User domain entity and related types.

use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TIMESTAMP_PRECISION_DIGITS;

/// Current time at the precision records are stored with.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(TIMESTAMP_PRECISION_DIGITS)
}

/// User domain entity
///
/// `id` is `None` until the store persists the record for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: Option<i64>,
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Construction timestamp, never modified
    pub created_at: DateTime<Utc>,
    /// Refreshed before every successful mutation
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new transient user; both timestamps are stamped to now.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at` ahead of a mutation.
    ///
    /// The new value is always strictly greater than the previous one, even
    /// when the clock has not moved.
    pub fn touch(&mut self) {
        let now = timestamp_now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Merge the non-identity fields of `details`, keeping `id` and `created_at`.
    pub fn apply(&mut self, details: UserDetails) {
        self.username = details.username;
        self.email = details.email;
        self.first_name = details.first_name;
        self.last_name = details.last_name;
        self.touch();
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User{{id=")?;
        match self.id {
            Some(id) => write!(f, "{}", id)?,
            None => write!(f, "null")?,
        }
        write!(
            f,
            ", username='{}', email='{}', firstName='{}', lastName='{}', createdAt={}, updatedAt={}}}",
            self.username,
            self.email,
            self.first_name,
            self.last_name,
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        )
    }
}

/// User fields a client may set, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserDetails {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl From<UserDetails> for User {
    fn from(details: UserDetails) -> Self {
        User::new(
            details.username,
            details.email,
            details.first_name,
            details.last_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new("alice", "a@x.com", "Alice", "Liddell")
    }

    #[test]
    fn test_new_user_is_transient_and_stamped() {
        let user = alice();

        assert!(user.id.is_none());
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_touch_strictly_increases_updated_at() {
        let mut user = alice();
        let created = user.created_at;

        for _ in 0..100 {
            let before = user.updated_at;
            user.touch();
            assert!(user.updated_at > before);
        }
        assert_eq!(user.created_at, created);
    }

    #[test]
    fn test_apply_preserves_identity() {
        let mut user = alice();
        user.id = Some(7);
        let created = user.created_at;
        let before = user.updated_at;

        user.apply(UserDetails::new("alice2", "b@y.com", "Al", "L"));

        assert_eq!(user.id, Some(7));
        assert_eq!(user.created_at, created);
        assert!(user.updated_at > before);
        assert_eq!(user.username, "alice2");
        assert_eq!(user.email, "b@y.com");
        assert_eq!(user.first_name, "Al");
        assert_eq!(user.last_name, "L");
    }

    #[test]
    fn test_display() {
        let mut user = User::new("testuser", "test@example.com", "John", "Doe");
        assert!(user.to_string().starts_with("User{id=null"));

        user.id = Some(1);
        let rendered = user.to_string();
        assert!(rendered.contains("User{"));
        assert!(rendered.contains("id=1"));
        assert!(rendered.contains("username='testuser'"));
        assert!(rendered.contains("email='test@example.com'"));
        assert!(rendered.contains("firstName='John'"));
        assert!(rendered.contains("lastName='Doe'"));
    }

    #[test]
    fn test_serializes_camel_case_with_timestamps() {
        let mut user = alice();
        user.id = Some(1);

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["lastName"], "Liddell");
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn test_details_round_trip_into_user() {
        let details = UserDetails::new("bob", "bob@example.com", "Bob", "Builder");
        let user = User::from(details.clone());

        assert_eq!(user.username, details.username);
        assert_eq!(user.email, details.email);
        assert_eq!(user.first_name, details.first_name);
        assert_eq!(user.last_name, details.last_name);
        assert!(user.id.is_none());
    }
}
