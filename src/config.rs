use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Development profile name.
pub const DEV: &str = "develop";
/// Production profile name.
pub const PRD: &str = "production";

/// Env var that selects the profile; wins over the `--env` flag.
pub const PROFILE_ENV: &str = "HEALTHY_WEB_APP";

const DEVELOP_YML: &str = include_str!("../config/application.develop.yml");
const PRODUCTION_YML: &str = include_str!("../config/application.production.yml");

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub username: String,
    pub password: String,
    pub migration: bool,
    pub max_connections: u32,
    pub seed: Option<SeedUser>,
    /// Full connection URL, only ever set from `DATABASE_URL`.
    #[serde(skip)]
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5432,
            dbname: "healthy_web".into(),
            username: "username".into(),
            password: "password".into(),
            migration: false,
            max_connections: 10,
            seed: None,
            url: None,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.username)
            .password(&self.password))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Feature toggles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub cors_enabled: bool,
    pub security_enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "healthy_web=debug,axum=info,tower_http=info".into(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip)]
    pub profile: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub extension: ExtensionConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Picks the profile from the environment / command line, parses the
    /// embedded YAML for it and applies env var overrides.
    pub fn load() -> anyhow::Result<Self> {
        let profile = select_profile(std::env::var(PROFILE_ENV).ok(), std::env::args().skip(1));
        let mut config = Self::for_profile(&profile)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn for_profile(profile: &str) -> anyhow::Result<Self> {
        let raw = match profile {
            DEV => DEVELOP_YML,
            PRD => PRODUCTION_YML,
            other => anyhow::bail!("unknown profile {other:?}, expected {DEV} or {PRD}"),
        };
        Self::from_yaml(profile, raw)
    }

    pub fn from_yaml(profile: &str, raw: &str) -> anyhow::Result<Self> {
        let mut config: AppConfig = serde_yaml::from_str(raw)
            .with_context(|| format!("failed to read application.{profile}.yml"))?;
        config.profile = profile.to_string();
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = var("APP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("APP_PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(filter) = var("RUST_LOG") {
            self.log.filter = filter;
        }
        match var("LOG_FORMAT").as_deref() {
            Some("json") => self.log.format = LogFormat::Json,
            Some("text") => self.log.format = LogFormat::Text,
            _ => {}
        }
    }
}

/// `env` wins; then `--env <name>` / `--env=<name>`; then `develop`.
pub fn select_profile<I>(env: Option<String>, args: I) -> String
where
    I: IntoIterator<Item = String>,
{
    if let Some(value) = env.filter(|v| !v.is_empty()) {
        return value;
    }
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let arg = arg.trim_start_matches('-');
        if let Some(value) = arg.strip_prefix("env=") {
            return value.to_string();
        }
        if arg == "env" {
            if let Some(value) = args.next() {
                return value;
            }
        }
    }
    DEV.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn profile_prefers_env_var() {
        let profile = select_profile(Some(PRD.into()), args(&["--env", DEV]));
        assert_eq!(profile, PRD);
    }

    #[test]
    fn profile_from_flag_forms() {
        assert_eq!(select_profile(None, args(&["--env", PRD])), PRD);
        assert_eq!(select_profile(None, args(&["-env=production"])), PRD);
        assert_eq!(select_profile(Some(String::new()), args(&["--env=develop"])), DEV);
    }

    #[test]
    fn profile_defaults_to_develop() {
        assert_eq!(select_profile(None, args(&[])), DEV);
        assert_eq!(select_profile(None, args(&["--env"])), DEV);
    }

    #[test]
    fn embedded_profiles_parse() {
        let dev = AppConfig::for_profile(DEV).unwrap();
        assert_eq!(dev.profile, DEV);
        assert!(dev.extension.cors_enabled);
        assert!(!dev.extension.security_enabled);
        assert_eq!(dev.database.seed.as_ref().unwrap().user_name, "test");

        let prd = AppConfig::for_profile(PRD).unwrap();
        assert!(prd.extension.security_enabled);
        assert_eq!(prd.log.format, LogFormat::Json);
        assert!(prd.database.seed.is_none());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let err = AppConfig::for_profile("staging").unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = AppConfig::from_yaml(DEV, "database:\n  dbname: other\n").unwrap();
        assert_eq!(config.database.dbname, "other");
        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.server.port, 8080);
        assert!(!config.extension.security_enabled);
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://u:p@db:5433/x"),
            ("APP_HOST", "0.0.0.0"),
            ("APP_PORT", "9000"),
            ("LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::for_profile(DEV).unwrap();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.addr().unwrap().to_string(), "0.0.0.0:9000");
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.database.connect_options().is_ok());
        assert_eq!(config.database.url.as_deref(), Some("postgres://u:p@db:5433/x"));
    }

    #[test]
    fn bad_port_override_is_ignored() {
        let mut config = AppConfig::for_profile(DEV).unwrap();
        config.apply_overrides(|k| (k == "APP_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 8080);
    }
}
