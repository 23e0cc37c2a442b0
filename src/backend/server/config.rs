/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * opening the SQLite connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is read from environment variables (a `.env` file is
 * loaded by the binary before this runs), with sensible defaults for local
 * development:
 *
 * | Variable              | Default                        |
 * |-----------------------|--------------------------------|
 * | `DATABASE_URL`        | `sqlite://xftodo.db?mode=rwc`  |
 * | `JWT_SECRET`          | development fallback (warned)  |
 * | `SERVER_PORT`         | `3000`                         |
 * | `STATIC_DIR`          | `public`                       |
 * | `EMAIL_USER`          | unset (reminders are logged)   |
 * | `EMAIL_PASS`          | unset                          |
 * | `EMAIL_FROM`          | `EMAIL_USER`                   |
 * | `SMTP_HOST`           | `smtp.gmail.com`               |
 * | `SMTP_PORT`           | `465`                          |
 * | `SMTP_TIMEOUT_SECS`   | `10`                           |
 * | `REMINDER_STRATEGY`   | `scheduled`                    |
 * | `REMINDER_LEAD_SECS`  | `300`                          |
 * | `SWEEP_INTERVAL_SECS` | `30`                           |
 * | `BCRYPT_COST`         | `10`                           |
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::backend::reminders::ReminderStrategy;

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Cost range bcrypt accepts
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

/// Outbound SMTP settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address
    pub from: String,
    /// Upper bound for a single delivery
    pub timeout: Duration,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub static_dir: String,
    /// `None` disables real delivery; reminders are written to the log
    pub smtp: Option<SmtpSettings>,
    pub reminder_strategy: ReminderStrategy,
    /// How long before the due instant a scheduled reminder fires
    pub reminder_lead: Duration,
    /// Tick length of the sweep strategy
    pub sweep_interval: Duration,
    /// Work factor for new password hashes
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = ServerConfig::builder();

        if let Some(url) = var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        match var("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => tracing::warn!("JWT_SECRET not set, using the development secret"),
        }
        if let Some(port) = var("SERVER_PORT") {
            builder = builder.port(parse_var("SERVER_PORT", &port)?);
        }
        if let Some(dir) = var("STATIC_DIR") {
            builder = builder.static_dir(dir);
        }
        if let Some(strategy) = var("REMINDER_STRATEGY") {
            let strategy = ReminderStrategy::from_str(&strategy).map_err(|_| {
                ConfigError::InvalidValue {
                    name: "REMINDER_STRATEGY",
                    value: strategy.clone(),
                }
            })?;
            builder = builder.reminder_strategy(strategy);
        }
        if let Some(secs) = var("REMINDER_LEAD_SECS") {
            builder = builder.reminder_lead(Duration::from_secs(parse_var("REMINDER_LEAD_SECS", &secs)?));
        }
        if let Some(secs) = var("SWEEP_INTERVAL_SECS") {
            builder = builder.sweep_interval(Duration::from_secs(parse_var("SWEEP_INTERVAL_SECS", &secs)?));
        }
        if let Some(cost) = var("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_var("BCRYPT_COST", &cost)?);
        }

        match (var("EMAIL_USER"), var("EMAIL_PASS")) {
            (Some(username), Some(password)) => {
                let port = match var("SMTP_PORT") {
                    Some(port) => parse_var("SMTP_PORT", &port)?,
                    None => 465,
                };
                let timeout = match var("SMTP_TIMEOUT_SECS") {
                    Some(secs) => Duration::from_secs(parse_var("SMTP_TIMEOUT_SECS", &secs)?),
                    None => Duration::from_secs(10),
                };
                builder = builder.smtp(SmtpSettings {
                    host: var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                    port,
                    from: var("EMAIL_FROM").unwrap_or_else(|| username.clone()),
                    username,
                    password,
                    timeout,
                });
            }
            (Some(_), None) => return Err(ConfigError::MissingValue("EMAIL_PASS")),
            _ => tracing::warn!("EMAIL_USER/EMAIL_PASS not set, reminders will only be logged"),
        }

        builder.build()
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Builder for ServerConfig
#[derive(Debug)]
pub struct ServerConfigBuilder {
    database_url: String,
    jwt_secret: String,
    port: u16,
    static_dir: String,
    smtp: Option<SmtpSettings>,
    reminder_strategy: ReminderStrategy,
    reminder_lead: Duration,
    sweep_interval: Duration,
    bcrypt_cost: u32,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            database_url: "sqlite://xftodo.db?mode=rwc".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            port: 3000,
            static_dir: "public".to_string(),
            smtp: None,
            reminder_strategy: ReminderStrategy::Scheduled,
            reminder_lead: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(30),
            bcrypt_cost: 10,
        }
    }
}

impl ServerConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<String>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn smtp(mut self, smtp: SmtpSettings) -> Self {
        self.smtp = Some(smtp);
        self
    }

    pub fn reminder_strategy(mut self, strategy: ReminderStrategy) -> Self {
        self.reminder_strategy = strategy;
        self
    }

    pub fn reminder_lead(mut self, lead: Duration) -> Self {
        self.reminder_lead = lead;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SWEEP_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }

        Ok(ServerConfig {
            database_url: self.database_url,
            jwt_secret: self.jwt_secret,
            port: self.port,
            static_dir: self.static_dir,
            smtp: self.smtp,
            reminder_strategy: self.reminder_strategy,
            reminder_lead: self.reminder_lead,
            sweep_interval: self.sweep_interval,
            bcrypt_cost: self.bcrypt_cost,
        })
    }
}

/// Open the SQLite pool and apply migrations
///
/// In-memory databases live only as long as their connection, so they get
/// a single connection that is never recycled.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database cannot be opened,
/// or a migration fails.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
