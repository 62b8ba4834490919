//! Bot configuration
//!
//! Read from `$SECTIONWATCH_CONFIG` or `~/.config/sectionwatch/config.toml`.
//! Every key is optional; the defaults run the bot on the Chinese Wikipedia.
//!
//! ```toml
//! [site]
//! api_url = "https://zh.wikipedia.org/w/api.php"
//! username = "Twelephant-bot"
//!
//! [schedule]
//! interval_secs = 600
//! reload_every = 6
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::wikitext::{DEFAULT_TIMESTAMP_PATTERN, RegexSignatureExtractor};
use crate::error::ConfigError;
use crate::output::OutputMode;
use crate::paths;

/// Complete bot configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Wiki connection
    pub site: SiteConfig,
    /// Where subscriptions come from
    pub subscription: SubscriptionConfig,
    /// How subscribers are told
    pub notification: NotificationConfig,
    /// Poll timing
    pub schedule: ScheduleConfig,
    /// Write behaviour
    pub edit: EditConfig,
    /// Signature recognition
    pub signature: SignatureConfig,
    /// Report rendering
    pub report: ReportConfig,
}

/// Wiki connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Action API endpoint
    pub api_url: String,
    /// Bot account
    pub username: String,
    /// Bot password; `$SECTIONWATCH_PASSWORD` takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// HTTP user agent
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_url: "https://zh.wikipedia.org/w/api.php".to_string(),
            username: "Twelephant-bot".to_string(),
            password: None,
            user_agent: format!("sectionwatch/{}", crate::VERSION),
            timeout_secs: 30,
        }
    }
}

/// Where subscriptions come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubscriptionConfig {
    /// Template every subscription page transcludes
    pub template: String,
    /// Page the watch table is mirrored to; empty disables it
    pub record_page: String,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            template: "User:Twelephant-bot/subscription".to_string(),
            record_page: "User:Twelephant-bot/subscription_record.json".to_string(),
        }
    }
}

impl SubscriptionConfig {
    /// Record page, if enabled
    #[must_use]
    pub fn record_page(&self) -> Option<&str> {
        let page = self.record_page.trim();
        (!page.is_empty()).then_some(page)
    }
}

/// How subscribers are told
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Template substituted onto the talk page
    pub template: String,
    /// Edit summary
    pub summary: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            template: "User:Twelephant-bot/notification".to_string(),
            summary: "章節新留言通知".to_string(),
        }
    }
}

/// Poll timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Seconds between ticks
    pub interval_secs: u64,
    /// Ticks per subscription reload
    pub reload_every: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 600,
            reload_every: 6,
        }
    }
}

impl ScheduleConfig {
    /// Tick interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Write behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditConfig {
    /// Attempts per write before giving up on edit conflicts
    pub max_attempts: u32,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
        }
    }
}

/// Signature recognition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignatureConfig {
    /// Regex matching the wiki's signature timestamp
    pub timestamp_pattern: String,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
        }
    }
}

/// Report rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// `human` or `json`
    pub format: OutputMode,
}

impl BotConfig {
    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::config_file()
    }

    /// Load the config file, or defaults if there is none
    ///
    /// `$SECTIONWATCH_PASSWORD` overrides the stored password. The result
    /// is validated.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            log::debug!("no config at {}; using defaults", path.display());
            Self::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without applying the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Take the password from `$SECTIONWATCH_PASSWORD` when set
    pub fn apply_env(&mut self) {
        if let Ok(password) = std::env::var(paths::PASSWORD_ENV)
            && !password.is_empty()
        {
            self.site.password = Some(password);
        }
    }

    /// Reject values the bot cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.api_url.trim().is_empty() {
            return Err(invalid("site.api_url", "must not be empty"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(invalid("schedule.interval_secs", "must be at least 1"));
        }
        if self.schedule.reload_every == 0 {
            return Err(invalid("schedule.reload_every", "must be at least 1"));
        }
        if self.edit.max_attempts == 0 {
            return Err(invalid("edit.max_attempts", "must be at least 1"));
        }
        RegexSignatureExtractor::new(&self.signature.timestamp_pattern)
            .map_err(|err| invalid("signature.timestamp_pattern", err.to_string()))?;
        Ok(())
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}
