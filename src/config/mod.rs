mod settings;

pub use settings::{
    DatabaseConfig, LoggingConfig, MessagesConfig, QueryRecipientConfig, RecipientConfig,
    ServerConfig, Settings, TriggerConfig,
};
