//! User account types for registration and login

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered staff account as stored in the `users` collection.
///
/// Accounts are created once and only ever read back during login; there is
/// no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Request body for `POST /register`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_wire_field_names() {
        let user = User {
            id: Uuid::new_v4(),
            username: "mei".to_string(),
            full_name: "Mei Lin".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["fullName"], "Mei Lin");
        assert!(value.get("passwordHash").is_some());
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn test_register_request_partial_body() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "username": "mei"
        }))
        .unwrap();

        assert_eq!(request.username.as_deref(), Some("mei"));
        assert!(request.full_name.is_none());
        assert!(request.password.is_none());
    }
}
