//! Admin client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_AUCTION_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_FISHON_API_BASE_URL: &str = "http://localhost:8010";
pub const DEFAULT_STORAGE_PATH: &str = ".seaseed-admin/storage.json";

/// Errors produced while building [`AdminConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
        }
    }
}

/// OAuth2 client credentials sent as HTTP Basic auth on the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionApiConfig {
    pub base_url: String,
    /// Static bearer token for the auction service. Empty when unset.
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishonApiConfig {
    pub base_url: String,
    pub client: Option<ClientCredentials>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub auction: AuctionApiConfig,
    pub fishon: FishonApiConfig,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
    /// Location of the persisted token store.
    pub storage_path: PathBuf,
    /// Clear the stored token when the route guard's probe is rejected.
    pub clear_token_on_reject: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            auction: AuctionApiConfig { base_url: DEFAULT_AUCTION_API_BASE_URL.to_owned(), token: String::new() },
            fishon: FishonApiConfig { base_url: DEFAULT_FISHON_API_BASE_URL.to_owned(), client: None },
            request_timeout_secs: None,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            clear_token_on_reject: false,
        }
    }
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `AUCTION_API_BASE_URL`: default `http://localhost:8000`
    /// - `AUCTION_API_TOKEN`: static bearer for the auction service
    /// - `FISHON_API_BASE_URL`: default `http://localhost:8010`
    /// - `FISHON_API_CLIENT_ID` / `FISHON_API_CLIENT_SECRET`: both or neither
    /// - `HTTP_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `SEASEED_STORAGE_PATH`: default `.seaseed-admin/storage.json`
    /// - `GUARD_CLEAR_TOKEN_ON_REJECT`: boolean, default false
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean value is malformed, or if
    /// only one half of the client credentials is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let auction = AuctionApiConfig {
            base_url: normalize_base_url(env_string("AUCTION_API_BASE_URL"), DEFAULT_AUCTION_API_BASE_URL),
            token: env_string("AUCTION_API_TOKEN").unwrap_or_default(),
        };

        let client = match (env_string("FISHON_API_CLIENT_ID"), env_string("FISHON_API_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(ClientCredentials { client_id, client_secret }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Parse("FISHON_API_CLIENT_ID set without FISHON_API_CLIENT_SECRET".into()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Parse("FISHON_API_CLIENT_SECRET set without FISHON_API_CLIENT_ID".into()));
            }
        };
        let fishon = FishonApiConfig {
            base_url: normalize_base_url(env_string("FISHON_API_BASE_URL"), DEFAULT_FISHON_API_BASE_URL),
            client,
        };

        let request_timeout_secs = env_parse_u64("HTTP_REQUEST_TIMEOUT_SECS")?;
        let storage_path = env_string("SEASEED_STORAGE_PATH").map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);
        let clear_token_on_reject = match env_string("GUARD_CLEAR_TOKEN_ON_REJECT") {
            None => false,
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::Parse(format!("invalid GUARD_CLEAR_TOKEN_ON_REJECT: {raw}")))?,
        };

        Ok(Self { auction, fishon, request_timeout_secs, storage_path, clear_token_on_reject })
    }
}

/// Non-empty value of `key`, if set.
fn env_string(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

fn env_parse_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = env_string(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::Parse(format!("invalid {key}: {raw}")))
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn normalize_base_url(raw: Option<String>, default: &str) -> String {
    raw.unwrap_or_else(|| default.to_owned())
        .trim()
        .trim_end_matches('/')
        .to_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
