use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Website roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Author,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Author => "Author",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Author" => Ok(Role::Author),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User entity - an account that can author posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// `None` for accounts created before the flag existed; treated as active.
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            username,
            email,
            password_hash,
            role,
            is_active: Some(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown next to posts and comments.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Author.to_string(), "Author");
        assert!("Guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_missing_active_flag_counts_as_active() {
        let mut user = User::new(
            "Ada".into(),
            "Lovelace".into(),
            "ada".into(),
            "ada@example.com".into(),
            "hash".into(),
            Role::Author,
        );
        user.is_active = None;
        assert!(user.is_active());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }
}
