//! Integration tests for sectionwatch
//!
//! These tests run the whole bot against an in-memory wiki, testing the full
//! cycle of: subscribe → load → reply → tick → talk-page notification

#[path = "../unit/common/mod.rs"]
#[allow(dead_code)]
mod common;

use common::{FakeWiki, ManualClock, section};
use sectionwatch::config::BotConfig;
use sectionwatch::core::models::WatchTable;
use sectionwatch::core::ports::EditMode;
use sectionwatch::output::PageOutcome;
use sectionwatch::scheduler::{Scheduler, StopHandle};
use sectionwatch::watcher::Watcher;

const PAGE: &str = "Wikipedia:Village pump";
const TALK: &str = "User talk:U";
const RECORD: &str = "User:Twelephant-bot/subscription_record.json";

/// Wiki where U watches ("Discussion", 2) on [`PAGE`], which Alice has signed
fn setup() -> FakeWiki {
    let wiki = FakeWiki::default();
    wiki.set_page(PAGE, &section("Discussion", &[("Alice", 0)]));
    wiki.subscribe_json("U", PAGE, &[("Discussion", 2)]);
    wiki
}

fn reply(wiki: &FakeWiki, signers: &[(&str, u32)]) {
    let mut all = vec![("Alice", 0)];
    all.extend_from_slice(signers);
    wiki.set_page(PAGE, &section("Discussion", &all));
}

fn notifications(wiki: &FakeWiki) -> Vec<String> {
    wiki.edits_to(TALK).into_iter().map(|e| e.mode.text().to_string()).collect()
}

// =============================================================================
// END-TO-END WORKFLOW TESTS
// =============================================================================

/// Bob replies in the watched section: exactly one talkback for U
#[test]
fn test_e2e_reply_notifies_subscriber() {
    let wiki = setup();
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();

    assert_eq!(watcher.poll().unchanged(), 1);
    assert!(notifications(&wiki).is_empty());

    reply(&wiki, &[("Bob", 5)]);
    let report = watcher.poll();
    assert_eq!(report.notified(), 1);

    let sent = notifications(&wiki);
    assert_eq!(
        sent,
        vec!["\n\n{{subst:User:Twelephant-bot/notification|1=Wikipedia:Village pump|2=Discussion}}"]
    );
    let edit = &wiki.edits_to(TALK)[0];
    assert_eq!(edit.summary, "章節新留言通知");
    assert!(matches!(edit.mode, EditMode::Append { .. }));

    // nothing new: no second message
    watcher.poll();
    assert_eq!(notifications(&wiki).len(), 1);
}

/// U replies in the watched section: no talkback
#[test]
fn test_e2e_own_reply_is_silent() {
    let wiki = setup();
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();

    reply(&wiki, &[("U", 5)]);
    let report = watcher.poll();
    assert_eq!(report.advanced(), 1);
    assert_eq!(report.notified(), 0);
    assert!(notifications(&wiki).is_empty());
}

/// The record page mirrors the advanced baseline
#[test]
fn test_e2e_record_page_tracks_baseline() {
    let wiki = setup();
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();
    assert_eq!(wiki.edits_to(RECORD).len(), 1);

    reply(&wiki, &[("Bob", 5)]);
    watcher.poll();
    assert_eq!(wiki.edits_to(RECORD).len(), 2);

    let record: WatchTable = serde_json::from_str(&wiki.text(RECORD).unwrap()).unwrap();
    let state = record.get("U", PAGE).unwrap();
    assert_eq!(Some(state.revision_id()), wiki.revision_id(PAGE));
    assert_eq!(&record, watcher.table());
}

/// A broken subscription page does not stop other users being served
#[test]
fn test_e2e_broken_user_is_isolated() {
    let wiki = setup();
    wiki.subscribe("User:Broken/subscription.json", "{not json");
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    let report = watcher.load().unwrap();
    assert_eq!(report.failures.len(), 1);

    reply(&wiki, &[("Bob", 5)]);
    assert_eq!(watcher.poll().notified(), 1);
}

/// A talk page that excludes the bot gets no message, but the baseline moves on
#[test]
fn test_e2e_nobots_talk_page() {
    let wiki = setup();
    wiki.set_page(TALK, "{{nobots}}");
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();

    reply(&wiki, &[("Bob", 5)]);
    let report = watcher.poll();
    assert_eq!(report.notified(), 0);
    assert_eq!(report.advanced(), 1);
    assert!(matches!(
        &report.outcomes[0].outcome,
        PageOutcome::Checked { failed_deliveries, skipped, .. }
            if failed_deliveries.is_empty() && skipped == &["Discussion"]
    ));
    assert!(notifications(&wiki).is_empty());
    assert_eq!(wiki.text(TALK).as_deref(), Some("{{nobots}}"));
}

/// A protected talk page is tried once and not retried
#[test]
fn test_e2e_protected_talk_page() {
    let wiki = setup();
    wiki.protect(TALK);
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();

    reply(&wiki, &[("Bob", 5)]);
    let report = watcher.poll();
    assert_eq!(report.notified(), 0);
    assert_eq!(wiki.edits_to(TALK).len(), 1);
}

/// The scheduler drives ticks and reloads with virtual time
#[test]
fn test_e2e_scheduled_run() {
    let wiki = setup();
    let mut config = BotConfig::default();
    config.schedule.reload_every = 2;
    let mut watcher = Watcher::new(&wiki, &config).unwrap();
    watcher.load().unwrap();

    reply(&wiki, &[("Bob", 5)]);
    let scheduler = Scheduler::new(config.schedule.interval(), config.schedule.reload_every);
    let ticks = scheduler.run(&mut watcher, &ManualClock::new(3), &StopHandle::new());

    assert_eq!(ticks, 3);
    assert_eq!(notifications(&wiki).len(), 1);
}
