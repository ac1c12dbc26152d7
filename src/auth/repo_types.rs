use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    #[serde(rename = "id")]
    pub user_id: i64,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 PHC string, never sent to clients
}
