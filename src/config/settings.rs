use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; parameterized recipients use in-memory lookups when unset
    pub url: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// "pretty" (default) or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Known-value tables used to validate messages and resolve recipients
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_triggers")]
    pub triggers: Vec<TriggerConfig>,
    #[serde(default = "default_template_styles")]
    pub template_styles: Vec<String>,
    #[serde(default = "default_recipients")]
    pub recipients: Vec<RecipientConfig>,
    #[serde(default = "default_query_recipients")]
    pub query_recipients: Vec<QueryRecipientConfig>,
    #[serde(default = "default_examples")]
    pub examples: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipientConfig {
    pub token: String,
    pub label: String,
}

/// A `<prefix>::<id>` recipient token backed by an entity lookup
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRecipientConfig {
    pub prefix: String,
    /// Label with a `{name}` placeholder for the entity's display name
    pub label: String,
    /// Table holding the entities (`id`, `name` columns)
    pub table: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u32 {
    5 // seconds
}

fn default_idle_timeout() -> u32 {
    600 // 10 minutes
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_triggers() -> Vec<TriggerConfig> {
    [
        ("questionnaire.pending", "Questionnaire Status: Pending Review (new application)"),
        ("questionnaire.accepted", "Questionnaire Status: Accepted"),
        ("questionnaire.waitlist", "Questionnaire Status: Waitlisted"),
        ("questionnaire.late_waitlist", "Questionnaire Status: Waitlisted, Late"),
        ("questionnaire.rsvp_confirmed", "Questionnaire Status: RSVP Confirmed"),
        ("questionnaire.rsvp_denied", "Questionnaire Status: RSVP Denied"),
        ("questionnaire.denied", "Questionnaire Status: Denied"),
    ]
    .into_iter()
    .map(|(id, description)| TriggerConfig {
        id: id.to_string(),
        description: description.to_string(),
    })
    .collect()
}

fn default_template_styles() -> Vec<String> {
    vec!["default".to_string()]
}

fn default_recipients() -> Vec<RecipientConfig> {
    [
        ("all", "Everyone"),
        ("incomplete", "Incomplete Applications"),
        ("complete", "Complete Applications"),
        ("accepted", "Accepted Applications"),
        ("denied", "Denied Applications"),
        ("waitlisted", "Waitlisted Applications"),
        ("late-waitlisted", "Late, Waitlisted Applications"),
        ("confirmed", "Confirmed Applications"),
        ("rsvp-denied", "Denied RSVPs"),
        ("checked-in", "Checked-in Attendees"),
    ]
    .into_iter()
    .map(|(token, label)| RecipientConfig {
        token: token.to_string(),
        label: label.to_string(),
    })
    .collect()
}

fn default_query_recipients() -> Vec<QueryRecipientConfig> {
    vec![
        QueryRecipientConfig {
            prefix: "school".to_string(),
            label: "Confirmed or Accepted: {name}".to_string(),
            table: "schools".to_string(),
        },
        QueryRecipientConfig {
            prefix: "bus-list".to_string(),
            label: "Signed up for {name}".to_string(),
            table: "bus_lists".to_string(),
        },
    ]
}

fn default_examples() -> HashMap<String, String> {
    [
        ("first_name", "John"),
        ("last_name", "Doe"),
        ("email", "john.doe@example.com"),
        ("school_name", "Example University"),
        ("status", "Accepted"),
        ("bus_list_name", "Example Bus"),
        ("checked_in", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("logging.format", "pretty")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER_HOST, SERVER_PORT, DATABASE_URL, LOGGING_FORMAT, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            triggers: default_triggers(),
            template_styles: default_template_styles(),
            recipients: default_recipients(),
            query_recipients: default_query_recipients(),
            examples: default_examples(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8082);

        let database = DatabaseConfig::default();
        assert!(database.url.is_none());
        assert_eq!(database.pool_size, 5);
    }

    #[test]
    fn test_default_message_tables() {
        let messages = MessagesConfig::default();
        assert_eq!(messages.triggers.len(), 7);
        assert!(messages.triggers.iter().any(|t| t.id == "questionnaire.pending"));
        assert_eq!(messages.template_styles, vec!["default".to_string()]);
        assert!(messages
            .recipients
            .iter()
            .any(|r| r.token == "all" && r.label == "Everyone"));
        assert!(messages.query_recipients.iter().any(|q| q.prefix == "school"));
        assert_eq!(messages.examples.get("first_name").map(String::as_str), Some("John"));
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:8082");
    }
}
