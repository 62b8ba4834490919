//! Regex-based signature extraction
//!
//! A signature is a link to a user, user talk or contributions page followed,
//! on the same line, by the nearest site timestamp. The match between the two
//! is non-greedy so a link binds to the first timestamp after it.
//!
//! A signature may carry several user links (`@[[User:A]] ok. [[User:B]]
//! <timestamp>`). It belongs to the last of them, the one next to the
//! timestamp.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;

use crate::core::models::Signature;
use crate::core::ports::SignatureExtractor;
use crate::error::AnalysisError;

/// Link prefixes that start a signature on zh.wikipedia, case-insensitive
///
/// `[[User:`, `[[User talk:`, `[[UT:`, `[[U:`, the Chinese user namespace
/// aliases with their talk forms, and `[[Special:Contributions/` in its
/// English and Chinese spellings.
pub const USER_LINK_PATTERN: &str = r"(?i:\[\[(?:(?:User(?:[ _]talk)?|UT?|(?:用[戶户]|使用者)(?:[討讨][論论])?):|Special:(?:Contrib(?:ution)?s|(?:用[戶户]|使用者)?[貢贡][獻献])/))";

/// zh.wikipedia signature timestamp, e.g. `2024年1月1日 (一) 10:00 (UTC)`
pub const DEFAULT_TIMESTAMP_PATTERN: &str =
    r"\d{4}年\d{1,2}月\d{1,2}日 \([一二三四五六日]\) \d{2}:\d{2} \(UTC\)";

/// Signature extractor for one site's link and timestamp conventions
///
/// Name patterns for [`SignatureExtractor::own_signatures`] are compiled once
/// per user and kept.
#[derive(Debug, Clone)]
pub struct RegexSignatureExtractor {
    any_user: Regex,
    link_target: Regex,
    names: RefCell<HashMap<String, Regex>>,
}

impl RegexSignatureExtractor {
    /// Extractor using `timestamp_pattern` for the date part
    pub fn new(timestamp_pattern: &str) -> Result<Self, AnalysisError> {
        let any_user = Regex::new(&format!("{USER_LINK_PATTERN}.*?(?:{timestamp_pattern})"))?;
        let link_target = Regex::new(&format!(r"{USER_LINK_PATTERN}([^|\]#/\n]*)"))?;
        Ok(Self {
            any_user,
            link_target,
            names: RefCell::new(HashMap::new()),
        })
    }

    /// Pattern matching a link target that names `user`
    ///
    /// The target must be exactly `user`. Spaces and underscores are
    /// interchangeable and the first letter ignores case, as MediaWiki
    /// capitalizes it.
    pub fn own_pattern(&self, user: &str) -> Result<Regex, AnalysisError> {
        if let Some(pattern) = self.names.borrow().get(user) {
            return Ok(pattern.clone());
        }
        let pattern = Regex::new(&format!("^{}$", user_name_pattern(user)))?;
        self.names.borrow_mut().insert(user.to_string(), pattern.clone());
        Ok(pattern)
    }

    /// User the signature belongs to, as written in its last user link
    #[must_use]
    pub fn signer<'s>(&self, signature: &'s Signature) -> Option<&'s str> {
        self.link_target
            .captures_iter(signature.as_str())
            .last()
            .and_then(|caps| caps.get(1))
            .map(|target| target.as_str().trim())
    }
}

impl SignatureExtractor for RegexSignatureExtractor {
    fn signatures(&self, text: &str) -> Vec<Signature> {
        self.any_user.find_iter(text).map(|m| Signature::new(m.as_str())).collect()
    }

    fn own_signatures(&self, text: &str, user: &str) -> Result<Vec<Signature>, AnalysisError> {
        let own = self.own_pattern(user)?;
        Ok(self
            .signatures(text)
            .into_iter()
            .filter(|sig| self.signer(sig).is_some_and(|name| own.is_match(name)))
            .collect())
    }
}

fn user_name_pattern(user: &str) -> String {
    let mut pattern = String::new();
    for (index, ch) in user.trim().chars().enumerate() {
        let mut buf = [0u8; 4];
        let escaped = regex::escape(ch.encode_utf8(&mut buf));
        match ch {
            ' ' | '_' => pattern.push_str("[ _]"),
            _ if index == 0 => {
                pattern.push_str("(?i:");
                pattern.push_str(&escaped);
                pattern.push(')');
            },
            _ => pattern.push_str(&escaped),
        }
    }
    pattern
}
