use std::time::Duration;

use healthy_web::{
    app,
    auth::{services::seed_user, store::PgSessionStore},
    config::{AppConfig, LogConfig, LogFormat},
    state::AppState,
};

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(300);

fn init_tracing(log: &LogConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(log.filter.as_str());
    match log.format {
        LogFormat::Json => builder.with_target(false).json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.log);
    tracing::info!(profile = %config.profile, "configuration loaded");

    let addr = config.server.addr()?;
    let app_state = AppState::init(config).await?;

    if app_state.config.database.migration {
        if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
    }

    if let Some(seed) = &app_state.config.database.seed {
        if let Err(e) = seed_user(&app_state.db, seed).await {
            tracing::warn!(error = %e, "seeding default user failed; continuing");
        }
    }

    let sessions = PgSessionStore::new(app_state.db.clone());
    tokio::spawn(sessions.delete_expired_every(SESSION_SWEEP_PERIOD));

    app::serve(app::build_app(app_state), addr).await
}
