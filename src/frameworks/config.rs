use std::{
    env, fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};
use url::Url;

// Runtime configuration, resolved once at startup.

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8000;
// Image edits carry base64 images, so the default is well above axum's 2 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub api_base_url: Url,
    pub text_model: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
    InvalidBaseUrl { value: String, reason: String },
    InvalidHost { value: String },
    InvalidPort { value: String },
    InvalidBodyLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "GEMINI_API_KEY must be set"),
            ConfigError::InvalidBaseUrl { value, reason } => {
                write!(f, "GEMINI_API_BASE_URL {value:?} is invalid: {reason}")
            }
            ConfigError::InvalidHost { value } => {
                write!(f, "RELAY_HOST {value:?} is not an IP address")
            }
            ConfigError::InvalidPort { value } => {
                write!(f, "RELAY_PORT {value:?} is not a valid port")
            }
            ConfigError::InvalidBodyLimit { value } => {
                write!(f, "RELAY_MAX_BODY_BYTES {value:?} is not a positive byte count")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// Keep the credential out of logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("text_model", &self.text_model)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Blank values count as unset, so `KEY=` in a .env file falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let base_url = read("GEMINI_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let api_base_url = parse_base_url(&base_url)?;

        let text_model = read("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.into());

        let host = match read("RELAY_HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost { value })?,
            None => DEFAULT_HOST,
        };

        let port = match read("RELAY_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };

        let max_body_bytes = match read("RELAY_MAX_BODY_BYTES") {
            Some(value) => match value.parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidBodyLimit { value }),
            },
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(RelayConfig {
            api_key,
            api_base_url,
            text_model,
            host,
            port,
            max_body_bytes,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|err| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }

    Ok(url)
}
