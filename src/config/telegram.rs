use std::{env, error::Error, fmt};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug)]
pub enum ConfigError {
    MissingEnv(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingEnv(name) => {
                write!(f, "required environment variable {} is not set", name)
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub timeout_ms: u64,
}

impl TelegramConfig {
    /// Reads credentials from the environment. Missing credentials are fatal at
    /// startup; the monitor must not silently run without a delivery channel.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            env::var(ENV_BOT_TOKEN).map_err(|_| ConfigError::MissingEnv(ENV_BOT_TOKEN))?;
        let chat_id = env::var(ENV_CHAT_ID).map_err(|_| ConfigError::MissingEnv(ENV_CHAT_ID))?;

        Ok(Self {
            bot_token,
            chat_id,
            timeout_ms: 30_000,
        })
    }
}
