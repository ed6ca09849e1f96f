// Copyright 2026 Reelharvest Contributors
// SPDX-License-Identifier: Apache-2.0

//! The harvest cycle state machine.
//!
//! One cycle is: scroll near the bottom, wait, scroll the rest of the way,
//! settle, then compare the document height against the last recorded one.
//! Growth means more posts arrived — extract and go again. Stagnation plus an
//! absent loading indicator is the termination heuristic; anything else just
//! re-enters the cycle. A "still loading" false read is never an error, the
//! retry is the policy.

use super::clock::Clock;
use super::dom::ProfilePage;
use super::links::LinkStore;
use super::HarvestConfig;
use anyhow::Result;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Jittered wait after the near-bottom scroll, in milliseconds.
/// Randomized to avoid tripping the host page's anti-automation heuristics.
const NEAR_BOTTOM_WAIT_MS: (u64, u64) = (600, 1200);
/// Settle time after scrolling to the very bottom.
const SETTLE_WAIT_MS: u64 = 150;
/// Jittered pause between an extraction and the next cycle.
const POST_EXTRACT_WAIT_MS: (u64, u64) = (10, 510);
/// Grace period before trusting a stagnant height reading.
const SPINNER_WAIT_MS: u64 = 1000;

/// Where one harvesting session is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Scroll to just above the bottom so the feed refresh retriggers.
    ScrollNearBottom,
    /// Scroll the rest of the way down and let the page settle.
    SettleAtBottom,
    /// Compare the current document height against the recorded one.
    CheckGrowth,
    /// Height stagnated; decide between another cycle and termination.
    CheckSpinner,
    /// No growth and no loading indicator: the feed is exhausted.
    Finished,
}

/// One run of the harvesting loop, from start to export.
///
/// Owns the link store and the last observed page height; both are only ever
/// touched from the single task driving the session.
pub struct HarvestSession {
    config: HarvestConfig,
    state: CycleState,
    links: LinkStore,
    last_height: i64,
    cycles: u32,
}

impl HarvestSession {
    pub fn new(config: HarvestConfig) -> Self {
        Self {
            config,
            state: CycleState::ScrollNearBottom,
            links: LinkStore::new(),
            last_height: 0,
            cycles: 0,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn links(&self) -> &LinkStore {
        &self.links
    }

    /// Cycles started so far.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Return the session to its initial state, dropping collected links.
    pub fn reset(&mut self) {
        self.links = LinkStore::new();
        self.state = CycleState::ScrollNearBottom;
        self.last_height = 0;
        self.cycles = 0;
    }

    /// Drive the cycle until it reaches `Finished`, then run the final
    /// extraction that catches whatever loaded after the last growth check.
    pub async fn run(&mut self, page: &dyn ProfilePage, clock: &dyn Clock) -> Result<()> {
        self.last_height = page.document_height().await?;
        debug!(height = self.last_height, "session started");

        while self.state != CycleState::Finished {
            self.step(page, clock).await?;
        }

        self.extract(page).await?;
        info!(links = self.links.len(), cycles = self.cycles, "session finished");
        Ok(())
    }

    /// Advance the state machine by one transition.
    pub async fn step(&mut self, page: &dyn ProfilePage, clock: &dyn Clock) -> Result<()> {
        match self.state {
            CycleState::ScrollNearBottom => {
                if self.config.max_cycles > 0 && self.cycles >= self.config.max_cycles {
                    warn!(cycles = self.cycles, "cycle cap reached, finalizing early");
                    self.state = CycleState::Finished;
                    return Ok(());
                }
                self.cycles += 1;

                let height = page.document_height().await?;
                let viewport = page.viewport_height().await?;
                page.scroll_to((height - viewport).max(0)).await?;
                clock.sleep(jitter(NEAR_BOTTOM_WAIT_MS)).await;
                self.state = CycleState::SettleAtBottom;
            }
            CycleState::SettleAtBottom => {
                let height = page.document_height().await?;
                page.scroll_to(height).await?;
                clock.sleep(Duration::from_millis(SETTLE_WAIT_MS)).await;
                self.state = CycleState::CheckGrowth;
            }
            CycleState::CheckGrowth => {
                let height = page.document_height().await?;
                if height != self.last_height {
                    debug!(from = self.last_height, to = height, "page grew");
                    self.extract(page).await?;
                    clock.sleep(jitter(POST_EXTRACT_WAIT_MS)).await;
                    // Re-read rather than reuse: the page may still have been
                    // growing while we extracted.
                    self.last_height = page.document_height().await?;
                    self.state = CycleState::ScrollNearBottom;
                } else {
                    clock.sleep(Duration::from_millis(SPINNER_WAIT_MS)).await;
                    self.state = CycleState::CheckSpinner;
                }
            }
            CycleState::CheckSpinner => {
                let spinner = page.spinner_present().await?;
                let height = page.document_height().await?;
                if !spinner && height == self.last_height {
                    self.state = CycleState::Finished;
                } else {
                    // Indicator still visible, or the height moved during the
                    // grace period. Either way: one more cycle.
                    self.state = CycleState::ScrollNearBottom;
                }
            }
            CycleState::Finished => {}
        }
        Ok(())
    }

    /// Scan matched anchors into the store, then prune the DOM tail.
    ///
    /// Extraction always precedes pruning within the same call, so a pruned
    /// element's link is guaranteed to have been captured.
    pub async fn extract(&mut self, page: &dyn ProfilePage) -> Result<()> {
        let hrefs = page.matched_hrefs().await?;
        for href in hrefs {
            if href.is_empty() {
                warn!("failed to read href from a matched anchor, skipping");
                continue;
            }
            self.links.insert(href);
        }
        info!(links = self.links.len(), "links collected");

        let removed = page.prune_matched(self.config.keep_tail).await?;
        if removed > 0 {
            debug!(removed, keep = self.config.keep_tail, "pruned matched anchors");
        }
        Ok(())
    }
}

fn jitter((lo, hi): (u64, u64)) -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}
