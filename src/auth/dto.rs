use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to clients. The password hash never
/// crosses this boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Response returned after sign-in.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            username: Some("ada".into()),
            name: None,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            created_at: datetime!(2025-06-01 12:00 UTC),
            updated_at: datetime!(2025-06-01 12:00 UTC),
        }
    }

    #[test]
    fn public_user_never_carries_the_hash() {
        let public = PublicUser::from(sample_user());
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn public_user_serializes_camel_case_rfc3339() {
        let public = PublicUser::from(sample_user());
        let value: serde_json::Value = serde_json::to_value(&public).unwrap();
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["createdAt"], "2025-06-01T12:00:00Z");
        assert!(value.get("created_at").is_none());
        // optional display name is present but null
        assert!(value["name"].is_null());
    }

    #[test]
    fn user_row_skips_hash_when_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
