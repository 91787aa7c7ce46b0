use crate::infrastructure::providers::SmtpSettings;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub session_duration_hours: i64,
    pub attachment_storage_path: String,
    pub attachment_public_url: String,
    pub max_attachment_bytes: usize,
    pub room_channel_capacity: usize,
    pub cors_origins: Vec<String>,
    pub smtp: Option<SmtpSettings>,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = get("DATABASE_URL", "sqlite://ticketdesk.db?mode=rwc");
        let server_host = get("SERVER_HOST", "127.0.0.1");
        let server_port = parse_number(&lookup, "SERVER_PORT", 10000u16)?;

        let admin_email = lookup("ADMIN_EMAIL").ok_or(ConfigError::MissingAdminEmail)?;
        let admin_password = lookup("ADMIN_PASSWORD").ok_or(ConfigError::MissingAdminPassword)?;
        let admin_name = get("ADMIN_NAME", "Administrator");

        let session_duration_hours = parse_number(&lookup, "SESSION_DURATION_HOURS", 24i64)?;
        if session_duration_hours <= 0 {
            return Err(ConfigError::InvalidNumber("SESSION_DURATION_HOURS".to_string()));
        }

        let attachment_storage_path = get("ATTACHMENT_STORAGE_PATH", "./attachments");
        let attachment_public_url = get("ATTACHMENT_PUBLIC_URL", "/attachments")
            .trim_end_matches('/')
            .to_string();
        let max_attachment_bytes = parse_number(&lookup, "MAX_ATTACHMENT_BYTES", 50 * 1024 * 1024usize)?;
        let room_channel_capacity = parse_number(&lookup, "ROOM_CHANNEL_CAPACITY", 256usize)?;

        let cors_origins = get("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let smtp = match lookup("SMTP_HOST").filter(|host| !host.trim().is_empty()) {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_number(&lookup, "SMTP_PORT", 587u16)?,
                username: lookup("SMTP_USERNAME"),
                password: lookup("SMTP_PASSWORD"),
                from: lookup("SMTP_FROM").ok_or(ConfigError::MissingSmtpFrom)?,
            }),
            None => None,
        };

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");
        let service_name = get("SERVICE_NAME", "ticketdesk");
        let metrics_port = parse_number(&lookup, "METRICS_PORT", 9000u16)?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            admin_email,
            admin_password,
            admin_name,
            session_duration_hours,
            attachment_storage_path,
            attachment_public_url,
            max_attachment_bytes,
            room_channel_capacity,
            cors_origins,
            smtp,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(key.to_string())),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ADMIN_EMAIL environment variable not set")]
    MissingAdminEmail,

    #[error("ADMIN_PASSWORD environment variable not set")]
    MissingAdminPassword,

    #[error("SMTP_FROM must be set when SMTP_HOST is configured")]
    MissingSmtpFrom,

    #[error("Invalid numeric value for {0}")]
    InvalidNumber(String),
}
