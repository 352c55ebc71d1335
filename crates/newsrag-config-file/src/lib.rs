//! NewsRAG client configuration
//!
//! Settings are read from a YAML or TOML file, then overridden by
//! `NEWSRAG_*` environment variables. Every setting has a default, so an
//! absent file is not an error unless it was asked for explicitly.

mod config;

pub use config::{
    ApiConfig, CONFIG_DIR_ENV, ClientConfig, DEFAULT_CONFIG_DIR, LoggingConfig, SessionConfig,
    WebhookSettings,
};
