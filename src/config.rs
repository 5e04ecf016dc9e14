// config.rs
use crate::error::Error;
use serde::Deserialize;
use std::io::ErrorKind;
use tokio::io::AsyncReadExt;
use tracing::Level;

const CONFIG_PATH: &str = "config.toml";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Discord webhook that receives a copy of info-and-above log lines.
    #[serde(default)]
    pub log_webhook_url: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Base URLs of the image providers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_purrbot_url")]
    pub purrbot_url: String,
    #[serde(default = "default_randomfox_url")]
    pub randomfox_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            purrbot_url: default_purrbot_url(),
            randomfox_url: default_randomfox_url(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_purrbot_url() -> String {
    "https://purrbot.site/api".to_string()
}

fn default_randomfox_url() -> String {
    "https://randomfox.ca".to_string()
}

impl Config {
    pub async fn load() -> Result<Self, crate::error::Error> {
        // A missing .env is fine, the variables may come from the process environment.
        dotenvy::dotenv().ok();

        let contents = match tokio::fs::File::open(CONFIG_PATH).await {
            Ok(mut file) => {
                let mut contents = String::new();
                AsyncReadExt::read_to_string(&mut file, &mut contents).await?;
                Some(contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds the config from optional toml contents, letting `env` override individual keys.
    pub fn from_sources(
        contents: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let mut config: Config = toml::from_str(contents.unwrap_or_default())?;

        if let Some(token) = env("KITSUNE_TOKEN") {
            config.bot_token = token;
        }
        if let Some(level) = env("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(url) = env("LOG_WEBHOOK_URL") {
            config.log_webhook_url = Some(url);
        }
        if let Some(timeout) = env("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs =
                timeout.trim().parse().map_err(|_| Error::InvalidConfig {
                    key: "REQUEST_TIMEOUT_SECS",
                    value: timeout.clone(),
                })?;
        }

        // An empty webhook url switches remote logging off.
        config.log_webhook_url = config
            .log_webhook_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if config.bot_token.trim().is_empty() {
            return Err(Error::MissingToken);
        }
        if config.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                key: "request_timeout_secs",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    /// The configured log level, or `None` if it doesn't name a tracing level.
    pub fn max_level(&self) -> Option<Level> {
        self.log_level.trim().parse().ok()
    }
}
