//! Tick and load reports
//!
//! Every poll tick and every configuration load produces a structured
//! report. Reports render either as a one-line human summary or as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ports::Delivery;

/// Output mode for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Human-readable summary (default)
    #[default]
    Human,
    /// JSON (machine-readable)
    Json,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {s}. Use 'human' or 'json'")),
        }
    }
}

/// What happened to one watched page during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Revision id equals the baseline; nothing compared
    Unchanged,
    /// The page no longer exists
    Missing,
    /// The page changed and was compared against the baseline
    Checked {
        /// Revision the baseline advanced to
        revision_id: u64,
        /// Section headings a notification was sent for
        notified: Vec<String>,
        /// Section headings whose notification was not delivered
        failed_deliveries: Vec<String>,
        /// Section headings not sent because the talk page opts out
        skipped: Vec<String>,
    },
    /// Checking failed; the baseline was left as it was
    Failed {
        /// Error message
        reason: String,
    },
}

impl PageOutcome {
    /// Outcome of a compared page given each notification's delivery
    #[must_use]
    pub fn checked(revision_id: u64, deliveries: Vec<(String, Delivery)>) -> Self {
        let mut notified = Vec::new();
        let mut failed_deliveries = Vec::new();
        let mut skipped = Vec::new();
        for (heading, delivery) in deliveries {
            match delivery {
                Delivery::Delivered => notified.push(heading),
                Delivery::Skipped(_) => skipped.push(heading),
                Delivery::Failed(_) => failed_deliveries.push(heading),
            }
        }
        Self::Checked {
            revision_id,
            notified,
            failed_deliveries,
            skipped,
        }
    }
}

/// Outcome for one (user, page) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    /// Subscriber
    pub user: String,
    /// Watched page
    pub page: String,
    /// What happened
    pub outcome: PageOutcome,
}

/// Result of one poll tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// When the tick started
    pub started_at: DateTime<Utc>,
    /// One entry per watched (user, page) pair, in visiting order
    pub outcomes: Vec<PageReport>,
}

impl TickReport {
    /// Start an empty report
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            outcomes: Vec::new(),
        }
    }

    /// Number of notifications delivered
    #[must_use]
    pub fn notified(&self) -> usize {
        self.outcomes
            .iter()
            .map(|p| match &p.outcome {
                PageOutcome::Checked {
                    notified, ..
                } => notified.len(),
                _ => 0,
            })
            .sum()
    }

    /// Number of pages whose baseline advanced
    #[must_use]
    pub fn advanced(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Checked { .. }))
    }

    /// Number of pages with no new revision
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Unchanged))
    }

    /// Number of pages that no longer exist
    #[must_use]
    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Missing))
    }

    /// Number of pages that could not be checked
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&PageOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|p| pred(&p.outcome)).count()
    }

    /// Render the report based on output mode
    #[must_use]
    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    fn render_human(&self) -> String {
        format!(
            "checked {} pages: {} notified, {} unchanged, {} missing, {} failed",
            self.outcomes.len(),
            self.notified(),
            self.unchanged(),
            self.missing(),
            self.failed()
        )
    }
}

/// A user whose subscription page could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFailure {
    /// Subscriber
    pub user: String,
    /// Subscription page title
    pub config_page: String,
    /// Error message
    pub reason: String,
}

/// Result of building a watch table
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Users whose configuration was read
    pub users: Vec<String>,
    /// Watched (user, page) pairs in the new table
    pub pages: usize,
    /// Users skipped because their configuration was unusable
    pub failures: Vec<UserFailure>,
}

impl LoadReport {
    /// Render the report based on output mode
    #[must_use]
    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Human => format!(
                "loaded {} users watching {} pages, {} skipped",
                self.users.len(),
                self.pages,
                self.failures.len()
            ),
            OutputMode::Json => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}
