use serde::{Deserialize, Serialize};

/// A stored account. `password` is the credential hash as persisted; it
/// travels with the cached record but never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password: String,
}
