//! Bot exclusion (`{{bots}}` / `{{nobots}}`)
//!
//! Pages opt out of bot edits with `{{nobots}}`, `{{bots|deny=...}}` or
//! `{{bots|allow=...}}`. Lists are comma separated; `all` and `none` are
//! keywords.

use std::sync::LazyLock;

use regex::Regex;

static NOBOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{\s*nobots\s*\}\}").expect("nobots pattern is valid"));

static BOTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{\s*bots\s*\|\s*(allow|deny)\s*=\s*([^}]*)\}\}").expect("bots pattern is valid")
});

/// Whether `bot` may edit a page whose text is `text`
#[must_use]
pub fn bot_may_edit(text: &str, bot: &str) -> bool {
    if NOBOTS.is_match(text) {
        return false;
    }

    let bot = normalize(bot);
    for caps in BOTS.captures_iter(text) {
        let names: Vec<String> = caps[2].split(',').map(normalize).collect();
        let listed = names.iter().any(|name| *name == bot);
        let allowed = if caps[1].eq_ignore_ascii_case("allow") {
            listed || names.iter().any(|name| name == "all")
        } else {
            !listed && !names.iter().any(|name| name == "all")
        };
        if !allowed {
            return false;
        }
    }
    true
}

fn normalize(name: &str) -> String {
    name.trim().replace('_', " ").to_lowercase()
}
