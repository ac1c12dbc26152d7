use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginDto, PublicUser},
        services::{authenticate, dummy_user},
        session::AuthSession,
    },
    error::{json_body, ApiError},
    state::AppState,
};

/// Routes reachable without a session. Login and logout exist only when
/// security is enabled.
pub fn auth_routes(security_enabled: bool) -> Router<AppState> {
    let router = Router::new().route("/auth/loginStatus", get(login_status));
    if !security_enabled {
        return router;
    }
    router
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Routes placed behind the login guard.
pub fn login_user_routes() -> Router<AppState> {
    Router::new().route("/auth/loginUser", get(login_user))
}

#[instrument(skip(state, session))]
pub async fn login_status(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<bool>, ApiError> {
    if !state.security_enabled() {
        return Ok(Json(true));
    }
    let logged_in = AuthSession::new(&session).is_authenticated().await?;
    Ok(Json(logged_in))
}

#[instrument(skip(state, session))]
pub async fn login_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<PublicUser>, ApiError> {
    if !state.security_enabled() {
        return Ok(Json(dummy_user()));
    }
    AuthSession::new(&session)
        .user()
        .await?
        .map(Json)
        .ok_or(ApiError::Unauthorized)
}

#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<LoginDto>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let dto = json_body(payload)?;
    let auth = AuthSession::new(&session);

    if let Some(user) = auth.user().await? {
        return Ok(Json(user));
    }

    let Some(user) = authenticate(&state.db, &dto.user_name, &dto.password).await? else {
        warn!(user_name = %dto.user_name, "login failed");
        return Err(ApiError::LoginFailed);
    };

    let public = PublicUser::from(&user);
    auth.login(&public).await?;
    info!(user_id = public.id, user_name = %public.user_name, "user logged in");
    Ok(Json(public))
}

#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode, ApiError> {
    AuthSession::new(&session).logout().await?;
    info!("user logged out");
    Ok(StatusCode::OK)
}
