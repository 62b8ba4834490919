//! Error types
//!
//! One enum per concern. Ports return these typed errors; the binary wraps
//! them in `anyhow` at the top level.

use thiserror::Error;

/// Errors talking to the wiki
#[derive(Debug, Error)]
pub enum WikiError {
    /// Someone else saved the page since our base revision
    #[error("edit conflict on '{0}'")]
    EditConflict(String),

    /// Page is protected or the account lacks the right to edit it
    #[error("'{0}' is protected")]
    Protected(String),

    /// The abuse filter disallowed the edit
    #[error("edit to '{0}' was disallowed by the abuse filter")]
    AbuseFilter(String),

    /// The edit adds a blacklisted URL
    #[error("edit to '{0}' was disallowed by the spam blacklist")]
    SpamBlacklist(String),

    /// The title is blacklisted
    #[error("title '{0}' is blacklisted")]
    TitleBlacklist(String),

    /// Login failed
    #[error("login as '{user}' failed: {reason}")]
    Login {
        /// Account name
        user: String,
        /// Result reported by the API
        reason: String,
    },

    /// The session expired or was never established
    #[error("not logged in ({0})")]
    SessionLost(String),

    /// Any other error returned by the API
    #[error("api error {code}: {info}")]
    Api {
        /// Machine-readable error code
        code: String,
        /// Human-readable message
        info: String,
    },

    /// The API answered with something we could not interpret
    #[error("unexpected api response: {0}")]
    Malformed(String),

    /// Transport failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl WikiError {
    /// Whether retrying the same write might succeed
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::EditConflict(_))
    }

    /// Whether the wiki refused the write on policy grounds
    #[must_use]
    pub const fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            Self::Protected(_) | Self::AbuseFilter(_) | Self::SpamBlacklist(_) | Self::TitleBlacklist(_)
        )
    }
}

/// Errors in a user's subscription page
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Script page without the expected `var _addText = ...;` wrapper
    #[error("subscription script does not contain the subscription list")]
    MissingList,

    /// Not valid JSON
    #[error("invalid subscription json: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON of the wrong shape
    #[error("entry {index} is not a [page, [[heading, level], ...]] pair")]
    BadEntry {
        /// Zero-based index of the offending entry
        index: usize,
    },

    /// The top-level value is not an array
    #[error("subscription list must be a json array")]
    NotAList,
}

/// Errors building text analyzers
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A signature or timestamp pattern did not compile
    #[error("invalid signature pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors checking one watched page
#[derive(Debug, Error)]
pub enum CheckError {
    /// Fetching the page failed
    #[error(transparent)]
    Wiki(#[from] WikiError),

    /// Signature extraction failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Errors in the local bot configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::BotConfig`]
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File path
        path: String,
        /// Underlying parse error
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Dotted key, e.g. `schedule.interval_secs`
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
