use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendSyncError {
    #[error("Missing required configuration: {field}")]
    ConfigMissing { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Provider throttled the query for '{keyword}'")]
    Throttled { keyword: String },

    #[error("Still throttled after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<TrendSyncError>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context} returned status {status}: {body}")]
    UnexpectedStatus {
        context: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Upsert batch rejected with status {status}: {body}")]
    StoreWrite { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure classes reported in per-keyword logs and used to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigMissing,
    Throttled,
    RetryExhausted,
    TransportFailure,
    StoreWriteFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::ConfigMissing => "ConfigMissing",
            ErrorKind::Throttled => "Throttled",
            ErrorKind::RetryExhausted => "RetryExhausted",
            ErrorKind::TransportFailure => "TransportFailure",
            ErrorKind::StoreWriteFailure => "StoreWriteFailure",
        };
        f.write_str(name)
    }
}

impl TrendSyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrendSyncError::ConfigMissing { .. }
            | TrendSyncError::InvalidConfigValue { .. }
            | TrendSyncError::ConfigParse { .. } => ErrorKind::ConfigMissing,
            TrendSyncError::Throttled { .. } => ErrorKind::Throttled,
            TrendSyncError::RetryExhausted { .. } => ErrorKind::RetryExhausted,
            TrendSyncError::StoreWrite { .. } => ErrorKind::StoreWriteFailure,
            TrendSyncError::Http(_)
            | TrendSyncError::UnexpectedStatus { .. }
            | TrendSyncError::MalformedResponse { .. }
            | TrendSyncError::Io(_)
            | TrendSyncError::Serialization(_) => ErrorKind::TransportFailure,
        }
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, TrendSyncError::Throttled { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::ConfigMissing => {
                "Set SUPABASE_URL and SUPABASE_ANON_KEY and check the --config file"
            }
            ErrorKind::Throttled | ErrorKind::RetryExhausted => {
                "The provider is rate limiting this host; rerun later or lower --limit"
            }
            ErrorKind::TransportFailure => {
                "Check network access to the store and provider endpoints"
            }
            ErrorKind::StoreWriteFailure => {
                "Check the trends table schema and its (keyword, date) unique constraint"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TrendSyncError>;
