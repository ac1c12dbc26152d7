use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};

use crate::{
    auth::{self, session::require_login, store::PgSessionStore},
    config::PRD,
    error::not_found,
    foods, meals,
    state::AppState,
};

const SESSION_IDLE_HOURS: i64 = 12;

pub fn build_app(state: AppState) -> Router {
    let security_enabled = state.security_enabled();
    let cors_enabled = state.config.extension.cors_enabled;

    let mut guarded = Router::new()
        .merge(meals::router())
        .merge(foods::router())
        .merge(auth::protected_router());
    if security_enabled {
        guarded = guarded.route_layer(middleware::from_fn(require_login));
    }

    let api = Router::new()
        .merge(guarded)
        .merge(auth::router(security_enabled))
        .route("/health", get(|| async { "ok" }));

    let sessions = SessionManagerLayer::new(PgSessionStore::new(state.db.clone()))
        .with_secure(state.config.profile == PRD)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(SESSION_IDLE_HOURS),
        ));

    let mut app = Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
        .layer(sessions)
        .layer(CatchPanicLayer::new());

    if cors_enabled {
        app = app.layer(cors_layer());
    }

    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                tracing::info_span!(
                    "http_request",
                    %method,
                    uri = %uri,
                    status = tracing::field::Empty
                )
            })
            .on_response(
                |res: &axum::http::Response<_>, _latency: Duration, span: &tracing::Span| {
                    let status = res.status();
                    span.record("status", tracing::field::display(status));
                    if status.is_server_error() {
                        tracing::error!(%status, "response");
                    } else {
                        tracing::info!(%status, "response");
                    }
                },
            ),
    )
}

/// Credentialed CORS for any origin; the request origin is echoed back since
/// a wildcard is not allowed together with credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
        ])
        .max_age(Duration::from_secs(86400))
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
