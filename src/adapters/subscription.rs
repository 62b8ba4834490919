//! Subscription pages and the watch-table loader
//!
//! Users subscribe by creating a page that transcludes the shared
//! subscription template:
//!
//! - `User:<name>/subscription.json` - a JSON array of
//!   `[page, [[heading, level], ...]]` entries closed by a sentinel entry
//! - `User:<name>/subscription.js` - `var _addText = "{{<template>}}";`
//!   followed on the next line by the JSON array and a `;`, then anything
//!
//! A broken page only costs its own user; everyone else still loads.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::core::models::{PageState, SectionKey, WatchEntry, WatchTable};
use crate::core::ports::{USER_NAMESPACE, WikiSite};
use crate::error::{SubscriptionError, WikiError};
use crate::output::{LoadReport, UserFailure};

static CONFIG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^User:([^/]+)/subscription\.(json|js)$").expect("subscription title pattern is valid")
});

/// How a subscription page encodes its list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Plain JSON with a trailing sentinel entry
    Json,
    /// JSON wrapped in a user script
    Script,
}

/// A discovered subscription page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPage {
    /// Subscriber, underscores read as spaces
    pub user: String,
    /// Page title
    pub title: String,
    /// Encoding
    pub format: ConfigFormat,
}

impl ConfigPage {
    /// Recognize `User:<name>/subscription.json` or `.js`
    #[must_use]
    pub fn identify(title: &str) -> Option<Self> {
        let caps = CONFIG_TITLE.captures(title)?;
        let format = if &caps[2] == "json" {
            ConfigFormat::Json
        } else {
            ConfigFormat::Script
        };
        Some(Self {
            user: caps[1].replace('_', " "),
            title: title.to_string(),
            format,
        })
    }
}

/// Parse the watch entries of a subscription page
pub fn parse_entries(
    content: &str,
    format: ConfigFormat,
    template: &str,
) -> Result<Vec<WatchEntry>, SubscriptionError> {
    let json = match format {
        ConfigFormat::Json => content,
        ConfigFormat::Script => script_list(content, template).ok_or(SubscriptionError::MissingList)?,
    };
    let Value::Array(mut items) = serde_json::from_str::<Value>(json)? else {
        return Err(SubscriptionError::NotAList);
    };
    if format == ConfigFormat::Json && items.last().is_some_and(|last| !is_entry(last)) {
        items.pop();
    }
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let (page, sections): (String, Vec<SectionKey>) =
                serde_json::from_value(item).map_err(|_| SubscriptionError::BadEntry {
                    index,
                })?;
            Ok(WatchEntry::new(page, sections))
        })
        .collect()
}

/// The JSON array inside `var _addText = "{{<template>}}";\n[...];`
///
/// The array ends at the first `];`; anything after it is ignored.
fn script_list<'c>(content: &'c str, template: &str) -> Option<&'c str> {
    let header = format!("var _addText = \"{{{{{template}}}}}\";");
    let rest = content.trim_start().strip_prefix(header.as_str())?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;
    if !rest.starts_with('[') {
        return None;
    }
    let end = rest.find("];")?;
    Some(&rest[..=end])
}

fn is_entry(value: &Value) -> bool {
    serde_json::from_value::<(String, Vec<SectionKey>)>(value.clone()).is_ok()
}

/// Builds a fresh [`WatchTable`] from the subscription pages on the wiki
pub struct SubscriptionLoader<'a> {
    site: &'a dyn WikiSite,
    template: String,
}

impl std::fmt::Debug for SubscriptionLoader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionLoader").field("template", &self.template).finish_non_exhaustive()
    }
}

impl<'a> SubscriptionLoader<'a> {
    /// Loader for pages transcluding `template`
    pub fn new(site: &'a dyn WikiSite, template: impl Into<String>) -> Self {
        Self {
            site,
            template: template.into(),
        }
    }

    /// Discover subscription pages, in title order
    pub fn discover(&self) -> Result<Vec<ConfigPage>, WikiError> {
        let mut titles = self.site.embedded_in(&self.template, USER_NAMESPACE)?;
        titles.sort();
        titles.dedup();
        Ok(titles.iter().filter_map(|title| ConfigPage::identify(title)).collect())
    }

    /// Build a new table; the baseline of every page is its current revision
    ///
    /// Fails only when discovery itself fails. Unusable subscription pages
    /// are listed in the report; watched pages that are missing or cannot be
    /// fetched are left out of the table.
    pub fn load(&self) -> Result<(WatchTable, LoadReport), WikiError> {
        let mut table = WatchTable::new();
        let mut report = LoadReport::default();

        for config in self.discover()? {
            let entries = match self.read_entries(&config) {
                Ok(Some(entries)) => entries,
                Ok(None) => continue,
                Err(reason) => {
                    log::warn!("skipping {} ({}): {reason}", config.user, config.title);
                    report.failures.push(UserFailure {
                        user: config.user,
                        config_page: config.title,
                        reason,
                    });
                    continue;
                },
            };

            table.add_user(&config.user);
            if !report.users.contains(&config.user) {
                report.users.push(config.user.clone());
            }
            for entry in entries {
                self.watch(&mut table, &config.user, entry);
            }
        }

        report.pages = table.page_count();
        Ok((table, report))
    }

    fn read_entries(&self, config: &ConfigPage) -> Result<Option<Vec<WatchEntry>>, String> {
        let Some(content) = self.site.page_text(&config.title).map_err(|err| err.to_string())? else {
            return Ok(None);
        };
        parse_entries(&content, config.format, &self.template).map(Some).map_err(|err| err.to_string())
    }

    fn watch(&self, table: &mut WatchTable, user: &str, entry: WatchEntry) {
        match self.site.latest_revision(&entry.page) {
            Ok(Some(revision)) => {
                let state = PageState::new(revision, entry.sections);
                if !table.insert(user, entry.page.as_str(), state) {
                    log::debug!("{user} lists '{}' twice; keeping the first", entry.page);
                }
            },
            Ok(None) => log::debug!("{user} watches missing page '{}'", entry.page),
            Err(err) => log::warn!("could not fetch '{}' for {user}: {err}", entry.page),
        }
    }
}
