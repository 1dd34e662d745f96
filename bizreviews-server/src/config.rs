//! Database connection configuration from the environment
//!
//! Precedence:
//! 1. `DATABASE_URL` - full PostgreSQL URL
//! 2. `INSTANCE_CONNECTION_NAME` - managed instance reached over the unix
//!    socket `<DB_SOCKET_DIR>/<INSTANCE_CONNECTION_NAME>`, with `DB_USER`,
//!    `DB_PASS` and `DB_NAME`
//!
//! Neither set is a fatal startup condition.

use std::path::PathBuf;

use sqlx::postgres::PgConnectOptions;

/// Default parent directory of managed-instance sockets
pub const DEFAULT_SOCKET_DIR: &str = "/cloudsql";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing database connection type. Please define INSTANCE_CONNECTION_NAME (or DATABASE_URL)")]
    MissingConnection,

    #[error("{var} must be set when INSTANCE_CONNECTION_NAME is used")]
    MissingVar { var: &'static str },

    #[error("invalid DATABASE_URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),
}

/// Where and how to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// Plain connection URL
    Url(String),

    /// Managed instance behind a unix socket
    Instance {
        connection_name: String,
        socket_dir: PathBuf,
        user: String,
        password: String,
        database: String,
    },
}

impl DatabaseConfig {
    /// Resolve from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = non_empty("DATABASE_URL") {
            return Ok(Self::Url(url));
        }

        let connection_name =
            non_empty("INSTANCE_CONNECTION_NAME").ok_or(ConfigError::MissingConnection)?;
        let require = |var: &'static str| non_empty(var).ok_or(ConfigError::MissingVar { var });

        Ok(Self::Instance {
            connection_name,
            socket_dir: non_empty("DB_SOCKET_DIR")
                .unwrap_or_else(|| DEFAULT_SOCKET_DIR.to_string())
                .into(),
            user: require("DB_USER")?,
            // An empty password is legal (IAM auth, trust)
            password: lookup("DB_PASS").unwrap_or_default(),
            database: require("DB_NAME")?,
        })
    }

    /// Build sqlx connect options.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match self {
            Self::Url(url) => url.parse().map_err(ConfigError::InvalidUrl),
            Self::Instance {
                connection_name,
                socket_dir,
                user,
                password,
                database,
            } => Ok(PgConnectOptions::new()
                .socket(socket_dir.join(connection_name))
                .username(user)
                .password(password)
                .database(database)),
        }
    }

    /// Loggable description without credentials.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(_) => "DATABASE_URL".to_string(),
            Self::Instance {
                connection_name,
                database,
                ..
            } => format!("instance {} (database {})", connection_name, database),
        }
    }
}
