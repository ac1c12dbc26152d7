use crate::auth::repo_types::User;
use anyhow::Context;
use sqlx::PgPool;

impl User {
    pub async fn find_by_name(db: &PgPool, user_name: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, password
              FROM users
             WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(db)
        .await
        .context("find user by name")?;
        Ok(user)
    }

    /// Inserts a user; `password_hash` must already be hashed.
    pub async fn create(db: &PgPool, user_name: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_name, password)
            VALUES ($1, $2)
            RETURNING user_id, user_name, password
            "#,
        )
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .context("create user")?;
        Ok(user)
    }
}
