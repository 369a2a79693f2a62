use serde::Serialize;

/// Outward user shape; the credential hash is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<user_models::User> for UserResponse {
    fn from(user: user_models::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use user_models::User;

    use super::*;

    #[test]
    fn test_response_omits_password() {
        let response = UserResponse::from(User {
            id: 3,
            email: "grace@example.com".to_string(),
            name: "Grace".to_string(),
            password: "secret-hash".to_string(),
        });

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], 3);
        assert!(json.get("password").is_none());
    }
}
