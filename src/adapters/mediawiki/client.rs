//! Blocking Action API client

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::response::{self, Recovery};
use crate::config::SiteConfig;
use crate::core::models::Revision;
use crate::core::ports::{EditMode, EditRequest, WikiSite};
use crate::error::WikiError;

/// A logged-in session on one wiki
///
/// Cookies from the login are kept by the HTTP client. The CSRF token is
/// fetched lazily and refetched once when the API reports it stale. A client
/// built with [`MediaWikiClient::connect`] logs in again when an edit finds
/// the session gone.
pub struct MediaWikiClient {
    http: Client,
    api_url: String,
    username: String,
    password: Option<String>,
    csrf: RefCell<Option<String>>,
}

impl std::fmt::Debug for MediaWikiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaWikiClient")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl MediaWikiClient {
    /// Build an anonymous session for `site`
    pub fn new(site: &SiteConfig) -> Result<Self, WikiError> {
        let http = Client::builder()
            .user_agent(site.user_agent.as_str())
            .timeout(Duration::from_secs(site.timeout_secs))
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            api_url: site.api_url.clone(),
            username: site.username.clone(),
            password: None,
            csrf: RefCell::new(None),
        })
    }

    /// Build a session and log in with a bot password
    pub fn connect(site: &SiteConfig, password: &str) -> Result<Self, WikiError> {
        let mut client = Self::new(site)?;
        client.login(password)?;
        client.password = Some(password.to_string());
        Ok(client)
    }

    /// Log in as the configured user
    pub fn login(&self, password: &str) -> Result<(), WikiError> {
        let tokens = self.get(&[("action", "query"), ("meta", "tokens"), ("type", "login")], "")?;
        let token = response::token(&tokens, "login")?;
        let reply = self.post(
            &[
                ("action", "login"),
                ("lgname", self.username.as_str()),
                ("lgpassword", password),
                ("lgtoken", token.as_str()),
            ],
            "",
        )?;
        response::login(&reply, &self.username)?;
        self.csrf.take();
        log::info!("logged in to {} as {}", self.api_url, self.username);
        Ok(())
    }

    fn get(&self, params: &[(&str, &str)], title: &str) -> Result<Value, WikiError> {
        let reply: Value = self
            .http
            .get(self.api_url.as_str())
            .query(&with_format(params))
            .send()?
            .error_for_status()?
            .json()?;
        response::check(reply, title)
    }

    fn post(&self, params: &[(&str, &str)], title: &str) -> Result<Value, WikiError> {
        let reply: Value = self
            .http
            .post(self.api_url.as_str())
            .form(&with_format(params))
            .send()?
            .error_for_status()?
            .json()?;
        response::check(reply, title)
    }

    fn csrf_token(&self) -> Result<String, WikiError> {
        if let Some(token) = self.csrf.borrow().as_ref() {
            return Ok(token.clone());
        }
        let reply = self.get(&[("action", "query"), ("meta", "tokens")], "")?;
        let token = response::token(&reply, "csrf")?;
        *self.csrf.borrow_mut() = Some(token.clone());
        Ok(token)
    }

    fn revisions(&self, title: &str, props: &str) -> Result<Value, WikiError> {
        self.get(
            &[
                ("action", "query"),
                ("prop", "revisions"),
                ("titles", title),
                ("rvprop", props),
                ("rvslots", "main"),
            ],
            title,
        )
    }

    fn try_edit(&self, request: &EditRequest) -> Result<(), WikiError> {
        let token = self.csrf_token()?;
        let base;
        let mut params = vec![
            ("action", "edit"),
            ("title", request.title.as_str()),
            ("summary", request.summary.as_str()),
            ("bot", "1"),
            ("assert", "user"),
            (if request.minor { "minor" } else { "notminor" }, "1"),
        ];
        match &request.mode {
            EditMode::Append {
                text,
            } => params.push(("appendtext", text.as_str())),
            EditMode::Replace {
                text,
                base_revision,
            } => {
                params.push(("text", text.as_str()));
                if let Some(id) = base_revision {
                    base = id.to_string();
                    params.push(("baserevid", base.as_str()));
                }
            },
        }
        params.push(("token", token.as_str()));
        let reply = self.post(&params, &request.title)?;
        response::edit(&reply, &request.title)
    }
}

fn with_format<'p>(params: &[(&'p str, &'p str)]) -> Vec<(&'p str, &'p str)> {
    let mut all = Vec::with_capacity(params.len() + 2);
    all.extend_from_slice(params);
    all.push(("format", "json"));
    all.push(("formatversion", "2"));
    all
}

impl WikiSite for MediaWikiClient {
    fn username(&self) -> &str {
        &self.username
    }

    fn latest_revision_id(&self, title: &str) -> Result<Option<u64>, WikiError> {
        response::revision_id(&self.revisions(title, "ids")?)
    }

    fn latest_revision(&self, title: &str) -> Result<Option<Revision>, WikiError> {
        response::revision(&self.revisions(title, "ids|content")?)
    }

    fn embedded_in(&self, template: &str, namespace: i32) -> Result<Vec<String>, WikiError> {
        let namespace = namespace.to_string();
        let mut titles = Vec::new();
        let mut next: Vec<(String, String)> = Vec::new();
        loop {
            let mut params = vec![
                ("action", "query"),
                ("list", "embeddedin"),
                ("eititle", template),
                ("einamespace", namespace.as_str()),
                ("eilimit", "max"),
            ];
            params.extend(next.iter().map(|(key, value)| (key.as_str(), value.as_str())));
            let reply = self.get(&params, template)?;
            let (page, more) = response::embedded_in(&reply)?;
            titles.extend(page);
            if more.is_empty() {
                return Ok(titles);
            }
            next = more;
        }
    }

    fn edit(&self, request: &EditRequest) -> Result<(), WikiError> {
        let err = match self.try_edit(request) {
            Err(err) => err,
            saved => return saved,
        };
        match response::recovery(&err) {
            Some(Recovery::RefreshToken) => {
                log::debug!("csrf token expired; fetching a new one");
                self.csrf.take();
            },
            Some(Recovery::Relogin) => {
                let Some(password) = self.password.as_deref() else {
                    return Err(err);
                };
                log::warn!("{err}; logging in again");
                self.login(password)?;
            },
            None => return Err(err),
        }
        self.try_edit(request)
    }
}
