use sqlx::PgPool;
use tracing::{debug, error, info};

use crate::{
    auth::{
        dto::PublicUser,
        password::{hash_password, verify_dummy_blocking, verify_password_blocking},
        repo_types::User,
    },
    config::SeedUser,
};

/// Returned by `loginUser` when security is disabled.
pub fn dummy_user() -> PublicUser {
    PublicUser {
        id: 0,
        user_name: "test".into(),
    }
}

/// Checks a user name / plaintext password pair against the stored hash.
/// `Ok(None)` means the credentials were rejected; `Err` is a lookup failure.
pub async fn authenticate(
    db: &PgPool,
    user_name: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    // Postgres text cannot hold NUL, so no stored user can match.
    let found = if user_name.contains('\0') {
        None
    } else {
        User::find_by_name(db, user_name).await?
    };
    let Some(user) = found else {
        verify_dummy_blocking(password.to_owned()).await;
        debug!(user_name, "unknown user");
        return Ok(None);
    };

    match verify_password_blocking(password.to_owned(), user.password.clone()).await {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(e) => {
            error!(error = %e, user_id = user.user_id, "stored password hash is unreadable");
            Ok(None)
        }
    }
}

/// Creates the configured default user unless one with that name exists.
pub async fn seed_user(db: &PgPool, seed: &SeedUser) -> anyhow::Result<()> {
    if User::find_by_name(db, &seed.user_name).await?.is_some() {
        debug!(user_name = %seed.user_name, "seed user already present");
        return Ok(());
    }
    let hash = hash_password(&seed.password)?;
    let user = User::create(db, &seed.user_name, &hash).await?;
    info!(user_id = user.user_id, user_name = %user.user_name, "seed user created");
    Ok(())
}
