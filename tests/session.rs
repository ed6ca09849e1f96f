//! Full-session integration test: drives the harvest state machine over an
//! in-memory profile page with a scripted feed and a clock that never waits,
//! then checks the exported artifact end to end.

use async_trait::async_trait;
use reelharvest::harvest::clock::Clock;
use reelharvest::harvest::dom::ProfilePage;
use reelharvest::harvest::export;
use reelharvest::harvest::{CycleState, HarvestConfig, HarvestSession};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

// ── Scripted profile page ──

struct Batch {
    anchors: Vec<String>,
    grow_by: i64,
    /// Spinner reads reporting "present" once this batch has loaded.
    spinner_reads: u32,
}

struct Inner {
    anchors: Vec<String>,
    height: i64,
    pending: VecDeque<Batch>,
    spinner_reads: u32,
    heading: Option<String>,
}

struct ScriptedPage {
    inner: Mutex<Inner>,
}

impl ScriptedPage {
    fn new(heading: Option<&str>, pending: Vec<Batch>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                anchors: Vec::new(),
                height: 2000,
                pending: pending.into(),
                spinner_reads: 0,
                heading: heading.map(str::to_string),
            }),
        }
    }

    fn matched_remaining(&self) -> Vec<String> {
        self.inner.lock().unwrap().anchors.clone()
    }
}

#[async_trait]
impl ProfilePage for ScriptedPage {
    async fn document_height(&self) -> anyhow::Result<i64> {
        Ok(self.inner.lock().unwrap().height)
    }

    async fn viewport_height(&self) -> anyhow::Result<i64> {
        Ok(900)
    }

    async fn scroll_to(&self, offset: i64) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if offset >= inner.height {
            if let Some(batch) = inner.pending.pop_front() {
                inner.anchors.extend(batch.anchors);
                inner.height += batch.grow_by;
                inner.spinner_reads = batch.spinner_reads;
            }
        }
        Ok(())
    }

    async fn matched_hrefs(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.inner.lock().unwrap().anchors.clone())
    }

    async fn prune_matched(&self, keep_tail: usize) -> anyhow::Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        let cut = inner.anchors.len().saturating_sub(keep_tail);
        inner.anchors.drain(..cut);
        Ok(cut)
    }

    async fn spinner_present(&self) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.spinner_reads > 0 {
            inner.spinner_reads -= 1;
            return Ok(true);
        }
        Ok(false)
    }

    async fn heading_text(&self) -> anyhow::Result<Option<String>> {
        Ok(self.inner.lock().unwrap().heading.clone())
    }
}

struct InstantClock;

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _duration: Duration) {}
}

// ── Feed builders ──

fn post(n: u32) -> String {
    format!("https://www.tiktok.com/@somebody/video/{n}")
}

fn photo(n: u32) -> String {
    format!("https://www.tiktok.com/@somebody/photo/{n}")
}

/// A realistic profile: 4 batches, duplicated anchors across batches (the
/// pruned tail overlaps the next load), one unreadable href, spinner
/// flickering between batches.
fn scripted_feed() -> Vec<Batch> {
    vec![
        Batch {
            anchors: (1..=30).map(post).collect(),
            grow_by: 3000,
            spinner_reads: 1,
        },
        Batch {
            anchors: (25..=60).map(post).chain([String::new()]).collect(),
            grow_by: 3000,
            spinner_reads: 2,
        },
        Batch {
            anchors: (1..=10).map(photo).collect(),
            grow_by: 1500,
            spinner_reads: 0,
        },
        Batch {
            anchors: (55..=70).map(post).collect(),
            grow_by: 1500,
            spinner_reads: 0,
        },
    ]
}

fn expected_urls() -> HashSet<String> {
    let mut set: HashSet<String> = (1..=70).map(post).collect();
    set.extend((1..=10).map(photo));
    set
}

// ── Tests ──

#[tokio::test]
async fn full_session_collects_every_link_the_feed_ever_showed() {
    let page = ScriptedPage::new(Some("somebody"), scripted_feed());
    let mut session = HarvestSession::new(HarvestConfig::default());

    session.run(&page, &InstantClock).await.unwrap();

    assert_eq!(session.state(), CycleState::Finished);

    let harvested: HashSet<String> = session.links().urls().map(str::to_string).collect();
    assert_eq!(harvested, expected_urls());

    // The DOM stayed bounded the whole way.
    assert!(page.matched_remaining().len() <= 20);
    for anchor in page.matched_remaining() {
        assert!(session.links().contains(&anchor));
    }
}

#[tokio::test]
async fn full_session_export_is_one_url_per_line_named_after_the_heading() {
    let page = ScriptedPage::new(Some("  somebody  "), scripted_feed());
    let mut session = HarvestSession::new(HarvestConfig::default());
    session.run(&page, &InstantClock).await.unwrap();

    let heading = page.heading_text().await.unwrap();
    let name = export::export_file_name(heading.as_deref());
    assert_eq!(name, "somebody.txt");

    let text = export::serialize_links(session.links());
    assert!(text.ends_with('\n'));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), session.links().len());
    let line_set: HashSet<String> = lines.iter().map(|s| s.to_string()).collect();
    assert_eq!(line_set, expected_urls());

    let dir = tempfile::TempDir::new().unwrap();
    let path = export::write_export(dir.path(), &name, &text).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), text);
}

#[tokio::test]
async fn full_session_falls_back_to_default_export_name() {
    let page = ScriptedPage::new(None, vec![]);
    let mut session = HarvestSession::new(HarvestConfig::default());
    session.run(&page, &InstantClock).await.unwrap();

    let heading = page.heading_text().await.unwrap();
    assert_eq!(
        export::export_file_name(heading.as_deref()),
        "TikTokLinks.txt"
    );
}

#[tokio::test]
async fn session_with_small_keep_tail_still_captures_everything() {
    let page = ScriptedPage::new(Some("somebody"), scripted_feed());
    let mut session = HarvestSession::new(HarvestConfig {
        keep_tail: 3,
        ..HarvestConfig::default()
    });

    session.run(&page, &InstantClock).await.unwrap();

    let harvested: HashSet<String> = session.links().urls().map(str::to_string).collect();
    assert_eq!(harvested, expected_urls());
    assert!(page.matched_remaining().len() <= 3);
}
