use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Violations};

/// User entity - represents a registered author/reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub about: String,
    pub avatar_url: String,
    pub preferred_categories: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(login: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            login,
            password_hash,
            name: String::new(),
            email: String::new(),
            about: String::new(),
            avatar_url: String::new(),
            preferred_categories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Login/password pair as received on registration.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    /// Login: 3-30 chars of letters, digits, underscore. Password: 6-100 chars.
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::new();
        let login = self.login.trim().to_string();

        let login_len = login.chars().count();
        if login.is_empty() {
            violations.push("login", "Login is required");
        } else if !(3..=30).contains(&login_len) {
            violations.push("login", "Login must be between 3 and 30 characters long");
        } else if !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            violations.push(
                "login",
                "Login can contain only letters, numbers, and underscores",
            );
        }

        let password_len = self.password.chars().count();
        if !(6..=100).contains(&password_len) {
            violations.push("password", "Password must be between 6 and 100 characters long");
        }

        violations.finish(Self {
            login,
            password: self.password,
        })
    }
}

/// Profile fields a user may edit. Absent fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            user.email = email.trim().to_string();
        }
        if let Some(about) = self.about {
            user.about = about.trim().to_string();
        }
        user.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let ok = Credentials {
            login: " writer_1 ".into(),
            password: "secret1".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.login, "writer_1");

        let bad = Credentials {
            login: "no spaces".into(),
            password: "123".into(),
        }
        .validate();
        let Err(DomainError::Validation(violations)) = bad else {
            panic!("expected validation error");
        };
        assert_eq!(violations.errors().len(), 2);
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new("writer".into(), "$argon2id$hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"login\":\"writer\""));
    }
}
