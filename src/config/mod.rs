use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::dispatcher::{Action, DispatchError, DispatcherOptions, When};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub dispatcher: DispatcherConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Raw dispatcher filters as read from the environment; validated by `to_options`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatcherConfig {
    pub options_file: Option<String>,
    pub models: Option<Vec<String>>,
    pub actions: Option<Vec<String>>,
    pub when: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    pub ansi: bool,
    pub with_target: bool,
    /// Emit newline-delimited JSON records instead of human-readable lines
    pub json: bool,
}

impl AppConfig {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_overrides(|key| env::var(key).ok())
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // Dispatcher overrides
        if let Some(v) = var("DISPATCH_OPTIONS_FILE") {
            self.dispatcher.options_file = Some(v).filter(|path| !path.trim().is_empty());
        }
        if let Some(v) = var("DISPATCH_MODELS") {
            self.dispatcher.models = parse_list(&v);
        }
        if let Some(v) = var("DISPATCH_ACTIONS") {
            self.dispatcher.actions = parse_list(&v);
        }
        if let Some(v) = var("DISPATCH_WHEN") {
            self.dispatcher.when = parse_list(&v);
        }

        // Logging overrides
        if let Some(v) = var("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("LOG_ANSI") {
            self.logging.ansi = v.parse().unwrap_or(self.logging.ansi);
        }
        if let Some(v) = var("LOG_WITH_TARGET") {
            self.logging.with_target = v.parse().unwrap_or(self.logging.with_target);
        }
        if let Some(v) = var("LOG_JSON") {
            self.logging.json = v.parse().unwrap_or(self.logging.json);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            dispatcher: DispatcherConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                ansi: true,
                with_target: true,
                json: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            dispatcher: DispatcherConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                ansi: false,
                with_target: true,
                json: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            dispatcher: DispatcherConfig::default(),
            logging: LoggingConfig {
                level: "warn".to_string(),
                ansi: false,
                with_target: false,
                json: true,
            },
        }
    }
}

impl DispatcherConfig {
    /// Build validated dispatcher options. Lists set here replace the matching
    /// key from `options_file`; unknown action or phase names are rejected.
    pub fn to_options(&self) -> Result<DispatcherOptions, DispatchError> {
        let mut options = match &self.options_file {
            Some(path) => DispatcherOptions::from_file(path)?,
            None => DispatcherOptions::default(),
        };

        if let Some(models) = &self.models {
            options.models = Some(models.clone());
        }
        if let Some(actions) = &self.actions {
            options.actions = Some(
                actions
                    .iter()
                    .map(|name| name.parse::<Action>())
                    .collect::<Result<_, _>>()?,
            );
        }
        if let Some(when) = &self.when {
            options.when = Some(
                when.iter()
                    .map(|name| name.parse::<When>())
                    .collect::<Result<_, _>>()?,
            );
        }

        Ok(options)
    }
}

/// Comma-separated list; blank or `*` means no restriction
fn parse_list(value: &str) -> Option<Vec<String>> {
    let value = value.trim();
    if value.is_empty() || value == "*" {
        return None;
    }
    Some(
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
