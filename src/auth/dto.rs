use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginDto {
    pub user_name: String,
    pub password: String,
}

/// Public part of the user, returned to clients and kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub user_name: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.user_id,
            user_name: u.user_name.clone(),
        }
    }
}
