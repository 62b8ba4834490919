//! Interpretation of Action API responses (`formatversion=2`)

use serde_json::Value;

use crate::core::models::Revision;
use crate::error::WikiError;

/// Turn an `{"error": {...}}` response into a [`WikiError`]
///
/// `title` names the page the request was about, for the error message.
pub fn check(response: Value, title: &str) -> Result<Value, WikiError> {
    let Some(error) = response.get("error") else {
        return Ok(response);
    };
    let code = error.get("code").and_then(Value::as_str).unwrap_or("unknown");
    let info = error.get("info").and_then(Value::as_str).unwrap_or_default();
    Err(classify(code, info, title))
}

/// Map an API error code onto the write taxonomy
#[must_use]
pub fn classify(code: &str, info: &str, title: &str) -> WikiError {
    let title = title.to_string();
    match code {
        "editconflict" => WikiError::EditConflict(title),
        "protectedpage" | "cascadeprotected" | "protectedtitle" | "permissiondenied"
        | "protectednamespace" | "protectednamespace-interface" => WikiError::Protected(title),
        "spamblacklist" | "spamdetected" => WikiError::SpamBlacklist(title),
        "titleblacklist-forbidden" | "titleblacklist-forbidden-edit" => WikiError::TitleBlacklist(title),
        code if code.starts_with("abusefilter") => WikiError::AbuseFilter(title),
        "assertuserfailed" | "assertbotfailed" | "notloggedin" => WikiError::SessionLost(code.to_string()),
        _ => WikiError::Api {
            code: code.to_string(),
            info: info.to_string(),
        },
    }
}

/// What to do before replaying a failed write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The CSRF token is stale; fetch a new one
    RefreshToken,
    /// The session is gone; log in again, then fetch a new token
    Relogin,
}

/// Whether `error` is cured by refreshing the session state
#[must_use]
pub fn recovery(error: &WikiError) -> Option<Recovery> {
    match error {
        WikiError::Api {
            code, ..
        } if code == "badtoken" => Some(Recovery::RefreshToken),
        WikiError::SessionLost(_) => Some(Recovery::Relogin),
        _ => None,
    }
}

fn first_page(response: &Value) -> Result<&Value, WikiError> {
    response
        .pointer("/query/pages/0")
        .ok_or_else(|| WikiError::Malformed("query returned no pages".into()))
}

fn page_exists(page: &Value) -> bool {
    !(page.get("missing").and_then(Value::as_bool).unwrap_or(false)
        || page.get("invalid").and_then(Value::as_bool).unwrap_or(false))
}

/// Latest revision id from `prop=revisions&rvprop=ids`
pub fn revision_id(response: &Value) -> Result<Option<u64>, WikiError> {
    let page = first_page(response)?;
    if !page_exists(page) {
        return Ok(None);
    }
    page.pointer("/revisions/0/revid")
        .and_then(Value::as_u64)
        .map(Some)
        .ok_or_else(|| WikiError::Malformed("revision without id".into()))
}

/// Latest revision from `prop=revisions&rvprop=ids|content&rvslots=main`
pub fn revision(response: &Value) -> Result<Option<Revision>, WikiError> {
    let page = first_page(response)?;
    if !page_exists(page) {
        return Ok(None);
    }
    let revision = page
        .pointer("/revisions/0")
        .ok_or_else(|| WikiError::Malformed("page without revisions".into()))?;
    let id = revision
        .get("revid")
        .and_then(Value::as_u64)
        .ok_or_else(|| WikiError::Malformed("revision without id".into()))?;
    let content = revision
        .pointer("/slots/main/content")
        .and_then(Value::as_str)
        .ok_or_else(|| WikiError::Malformed("revision without content".into()))?;
    Ok(Some(Revision::new(id, content)))
}

/// Titles from `list=embeddedin` plus the continuation parameters, if any
pub fn embedded_in(response: &Value) -> Result<(Vec<String>, Vec<(String, String)>), WikiError> {
    let list = response
        .pointer("/query/embeddedin")
        .and_then(Value::as_array)
        .ok_or_else(|| WikiError::Malformed("missing embeddedin list".into()))?;
    let titles = list
        .iter()
        .filter_map(|page| page.get("title").and_then(Value::as_str).map(str::to_string))
        .collect();
    Ok((titles, continuation(response)))
}

fn continuation(response: &Value) -> Vec<(String, String)> {
    response
        .get("continue")
        .and_then(Value::as_object)
        .map(|params| {
            params
                .iter()
                .filter_map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        _ => return None,
                    };
                    Some((key.clone(), value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A token from `meta=tokens`
pub fn token(response: &Value, kind: &str) -> Result<String, WikiError> {
    response
        .pointer(&format!("/query/tokens/{kind}token"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WikiError::Malformed(format!("missing {kind} token")))
}

/// Outcome of `action=login`
pub fn login(response: &Value, user: &str) -> Result<(), WikiError> {
    let result = response.pointer("/login/result").and_then(Value::as_str).unwrap_or("missing");
    if result == "Success" {
        return Ok(());
    }
    let reason = response
        .pointer("/login/reason")
        .and_then(Value::as_str)
        .map_or_else(|| result.to_string(), |reason| format!("{result}: {reason}"));
    Err(WikiError::Login {
        user: user.to_string(),
        reason,
    })
}

/// Outcome of `action=edit`
pub fn edit(response: &Value, title: &str) -> Result<(), WikiError> {
    match response.pointer("/edit/result").and_then(Value::as_str) {
        Some("Success") => Ok(()),
        Some(other) => {
            let code = response
                .get("edit")
                .and_then(Value::as_object)
                .and_then(|edit| edit.keys().find(|k| k.starts_with("abusefilter") || *k == "spamblacklist"))
                .map_or(other, String::as_str);
            Err(classify(code, other, title))
        },
        None => Err(WikiError::Malformed(format!("edit of '{title}' returned no result"))),
    }
}
