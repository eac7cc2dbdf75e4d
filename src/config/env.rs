use crate::utils::error::{Result, TrendSyncError};
use crate::utils::validation::{validate_url, Validate};

pub const STORE_URL_VAR: &str = "SUPABASE_URL";
pub const STORE_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Backing store address and API key. Both are required at startup.
#[derive(Clone)]
pub struct StoreCredentials {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl StoreCredentials {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through `lookup` so callers can supply a map instead
    /// of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| TrendSyncError::ConfigMissing {
                    field: name.to_string(),
                })
        };

        let credentials = Self::new(required(STORE_URL_VAR)?, required(STORE_KEY_VAR)?);
        credentials.validate()?;
        Ok(credentials)
    }
}

impl Validate for StoreCredentials {
    fn validate(&self) -> Result<()> {
        validate_url(STORE_URL_VAR, &self.base_url)
    }
}
