use std::env;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Settings {
    runtime: RuntimeSettings,
    backend: BackendSettings,
    database: DatabaseSettings,
    local_store: LocalStoreSettings,
    json_store: JsonStoreSettings,
    telemetry: TelemetrySettings,
}

/// Which backend adapter the process runs against. Chosen once at startup;
/// there is no runtime switching mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    Local,
    Json,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Remote => "remote",
            BackendKind::Local => "local",
            BackendKind::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub(crate) kind: BackendKind,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub(crate) postgres_server: String,
    pub(crate) postgres_port: u16,
    pub(crate) postgres_user: String,
    pub(crate) postgres_password: String,
    pub(crate) postgres_db: String,
    pub(crate) database_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocalStoreSettings {
    pub(crate) sqlite_path: String,
}

#[derive(Debug, Clone)]
pub struct JsonStoreSettings {
    pub(crate) snapshot_path: Option<String>,
    pub(crate) flush_debounce_ms: u64,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub(crate) environment: Environment,
    pub(crate) strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }

    fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("missing required secret for {0}")]
    MissingSecret(&'static str),
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = parse_environment(
            env_optional("CARECLASS_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config = env_optional("CARECLASS_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let backend_kind = parse_backend_kind(env_optional("CARECLASS_BACKEND"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "careclass");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "careclass_db");
        let database_url = env_optional("DATABASE_URL");

        let sqlite_path = env_or_default("CARECLASS_SQLITE_PATH", "careclass.db");

        let snapshot_path = env_optional("CARECLASS_SNAPSHOT_PATH");
        let flush_debounce_ms = parse_u64(
            "CARECLASS_FLUSH_DEBOUNCE_MS",
            env_or_default("CARECLASS_FLUSH_DEBOUNCE_MS", "750"),
        )?;

        let log_level = env_or_default("CARECLASS_LOG_LEVEL", "info");
        let json = env_optional("CARECLASS_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            backend: BackendSettings { kind: backend_kind },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            local_store: LocalStoreSettings { sqlite_path },
            json_store: JsonStoreSettings { snapshot_path, flush_debounce_ms },
            telemetry: TelemetrySettings { log_level, json },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind
    }

    pub fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub fn local_store(&self) -> &LocalStoreSettings {
        &self.local_store
    }

    pub fn json_store(&self) -> &JsonStoreSettings {
        &self.json_store
    }

    pub fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.json_store.flush_debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "CARECLASS_FLUSH_DEBOUNCE_MS",
                value: "0".to_string(),
            });
        }

        if self.local_store.sqlite_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "CARECLASS_SQLITE_PATH",
                value: String::from("<empty>"),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        // The development-only JSON store must not back a production process.
        if self.backend.kind == BackendKind::Json {
            return Err(ConfigError::InvalidValue {
                field: "CARECLASS_BACKEND",
                value: String::from("json"),
            });
        }

        if self.backend.kind == BackendKind::Remote
            && self.database.database_url.is_none()
            && self.database.postgres_password.is_empty()
        {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}

impl DatabaseSettings {
    pub(crate) fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.postgres_user,
            self.postgres_password,
            self.postgres_server,
            self.postgres_port,
            self.postgres_db
        )
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_u16(field: &'static str, value: String) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

fn parse_environment(value: Option<String>) -> Environment {
    match value.as_deref().map(|val| val.to_lowercase()) {
        Some(ref val) if val == "production" || val == "prod" => Environment::Production,
        Some(ref val) if val == "staging" => Environment::Staging,
        Some(ref val) if val == "test" || val == "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_backend_kind(value: Option<String>) -> Result<BackendKind, ConfigError> {
    match value.as_deref().map(|val| val.to_lowercase()) {
        None => Ok(BackendKind::Json),
        Some(ref val) if val == "json" || val == "memory" => Ok(BackendKind::Json),
        Some(ref val) if val == "local" || val == "sqlite" => Ok(BackendKind::Local),
        Some(ref val) if val == "remote" || val == "postgres" => Ok(BackendKind::Remote),
        Some(val) => Err(ConfigError::InvalidValue { field: "CARECLASS_BACKEND", value: val }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backend_kind_variants() {
        assert_eq!(parse_backend_kind(None).unwrap(), BackendKind::Json);
        assert_eq!(parse_backend_kind(Some("json".to_string())).unwrap(), BackendKind::Json);
        assert_eq!(parse_backend_kind(Some("MEMORY".to_string())).unwrap(), BackendKind::Json);
        assert_eq!(parse_backend_kind(Some("sqlite".to_string())).unwrap(), BackendKind::Local);
        assert_eq!(parse_backend_kind(Some("remote".to_string())).unwrap(), BackendKind::Remote);
        assert!(parse_backend_kind(Some("mongo".to_string())).is_err());
    }

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("production".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }
}
