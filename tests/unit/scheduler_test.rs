//! Tests for the poll loop driven by virtual time

use std::time::Duration;

use sectionwatch::config::BotConfig;
use sectionwatch::scheduler::{Scheduler, StopHandle, Task};
use sectionwatch::watcher::Watcher;

use crate::common::{FakeWiki, ManualClock, section};

const RECORD: &str = "User:Twelephant-bot/subscription_record.json";

#[test]
fn test_ticks_and_reloads_on_schedule() {
    let wiki = FakeWiki::default();
    wiki.set_page("Talk:P", &section("Discussion", &[]));
    wiki.subscribe_json("U", "Talk:P", &[("Discussion", 2)]);
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();

    let clock = ManualClock::new(13);
    let ticks = Scheduler::new(Duration::from_secs(600), 6).run(&mut watcher, &clock, &StopHandle::new());

    assert_eq!(ticks, 13);
    assert_eq!(clock.elapsed(), Duration::from_secs(600 * 13));
    // one record save per reload, none for ticks that advanced nothing
    assert_eq!(wiki.edits_to(RECORD).len(), 2);
    assert_eq!(watcher.table().user_count(), 1);
}

#[test]
fn test_stopped_handle_runs_nothing() {
    let wiki = FakeWiki::default();
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    let stop = StopHandle::new();
    stop.stop();

    let ticks = Scheduler::new(Duration::from_secs(1), 1).run(&mut watcher, &ManualClock::new(10), &stop);
    assert_eq!(ticks, 0);
    assert!(wiki.edits().is_empty());
}

#[test]
fn test_failed_reload_keeps_previous_table() {
    let wiki = FakeWiki::default();
    wiki.set_page("Talk:P", &section("Discussion", &[]));
    wiki.subscribe_json("U", "Talk:P", &[("Discussion", 2)]);
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();

    wiki.set_discovery_down(true);
    watcher.reload();
    assert!(watcher.table().get("U", "Talk:P").is_some());
}

#[test]
fn test_reload_picks_up_new_subscribers() {
    let wiki = FakeWiki::default();
    wiki.set_page("Talk:P", &section("Discussion", &[]));
    let mut watcher = Watcher::new(&wiki, &BotConfig::default()).unwrap();
    watcher.load().unwrap();
    assert!(watcher.table().is_empty());

    wiki.subscribe_json("U", "Talk:P", &[("Discussion", 2)]);
    watcher.reload();
    assert_eq!(watcher.table().page_count(), 1);
}

#[test]
fn test_record_page_can_be_disabled() {
    let wiki = FakeWiki::default();
    wiki.set_page("Talk:P", &section("Discussion", &[]));
    wiki.subscribe_json("U", "Talk:P", &[("Discussion", 2)]);
    let mut config = BotConfig::default();
    config.subscription.record_page = String::new();

    let mut watcher = Watcher::new(&wiki, &config).unwrap();
    watcher.load().unwrap();
    assert!(wiki.edits().is_empty());
}
