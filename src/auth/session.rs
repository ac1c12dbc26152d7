use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::{session, Session};

use crate::{auth::dto::PublicUser, error::ApiError};

const SESSION_AUTH_USER: &str = "auth:user";

/// Authentication state kept in the server-side session.
pub struct AuthSession<'a> {
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn user(&self) -> Result<Option<PublicUser>, session::Error> {
        self.session.get::<PublicUser>(SESSION_AUTH_USER).await
    }

    pub async fn is_authenticated(&self) -> Result<bool, session::Error> {
        Ok(self.user().await?.is_some())
    }

    /// Stores `user` under a fresh session id.
    pub async fn login(&self, user: &PublicUser) -> Result<(), session::Error> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER, user).await
    }

    /// Drops all session data and the session record.
    pub async fn logout(&self) -> Result<(), session::Error> {
        self.session.flush().await
    }
}

/// Rejects requests without a logged-in user with 401 `false`.
pub async fn require_login(session: Session, req: Request, next: Next) -> Response {
    match AuthSession::new(&session).is_authenticated().await {
        Ok(true) => next.run(req).await,
        Ok(false) => ApiError::Unauthorized.into_response(),
        Err(e) => ApiError::Session(e).into_response(),
    }
}
