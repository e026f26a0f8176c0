use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_duration_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,
    /// Account created at startup when no admin with this username exists.
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    #[serde(default)]
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// STARTTLS on `port` when true, plaintext otherwise.
    pub use_tls: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub default_sender: String,
    pub recipients: Vec<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "smtp.gmail.com".to_string(),
            port: 587,
            use_tls: true,
            username: None,
            password: None,
            default_sender: "no-reply@cas.local".to_string(),
            recipients: default_recipients(),
        }
    }
}

fn default_recipients() -> Vec<String> {
    vec![
        "secretaria@cas.local".to_string(),
        "direccion@cas.local".to_string(),
    ]
}

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("auth.session_secret", defaults.auth.session_secret)?
            .set_default("auth.session_duration_hours", defaults.auth.session_duration_hours)?
            .set_default("auth.secure_cookies", defaults.auth.secure_cookies)?
            .set_default("auth.admin_username", defaults.auth.admin_username)?
            .set_default("auth.admin_password", defaults.auth.admin_password)?
            .set_default("uploads.dir", defaults.uploads.dir)?
            .set_default("uploads.max_body_bytes", defaults.uploads.max_body_bytes as i64)?
            .set_default("mail.enabled", defaults.mail.enabled)?
            .set_default("mail.host", defaults.mail.host)?
            .set_default("mail.port", defaults.mail.port as i64)?
            .set_default("mail.use_tls", defaults.mail.use_tls)?
            .set_default("mail.default_sender", defaults.mail.default_sender)?
            .set_default("mail.recipients", defaults.mail.recipients)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Environment variables (CAS__ prefix, double underscore separates levels)
            .add_source(
                Environment::with_prefix("CAS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("mail.recipients")
                    .try_parsing(true),
            )

            .build()?;

        config.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://cas.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_secret: "clave_secreta_cas".to_string(),
                session_duration_hours: 24,
                secure_cookies: false,
                admin_username: "admin".to_string(),
                admin_password: "cas2025".to_string(),
            },
            uploads: UploadConfig {
                dir: "static/uploads/gallery_photos".to_string(),
                max_body_bytes: MAX_BODY_BYTES,
            },
            mail: MailConfig::default(),
        }
    }
}
