//! The scroll-harvest-export loop.
//!
//! One harvesting session drives a profile page: scroll toward the bottom,
//! wait for the feed to load, collect matching post links out of the DOM,
//! prune the DOM tail to bound memory, and stop once the page height
//! stagnates with no loading indicator in sight.

pub mod clock;
pub mod cycle;
pub mod dom;
pub mod export;
pub mod links;

pub use cycle::{CycleState, HarvestSession};
pub use links::LinkStore;

/// CSS selectors the harvester reads from the host page.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// Anchors pointing at individual posts.
    pub post_anchor: String,
    /// The loading indicator that signals more content is on its way.
    pub spinner: String,
    /// The page heading used to name the export file.
    pub heading: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            post_anchor: "a[href*='/video/'], a[href*='/photo/']".to_string(),
            spinner: "#main-content-others_homepage .css-qmnyxf-SvgContainer".to_string(),
            heading: "h1".to_string(),
        }
    }
}

/// Tunables for one harvesting session.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// How many matched anchors survive each pruning pass.
    pub keep_tail: usize,
    /// Safety cap on harvest cycles; 0 means unbounded, like the feed itself.
    pub max_cycles: u32,
    /// Selectors for the host page.
    pub selectors: PageSelectors,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            keep_tail: 20,
            max_cycles: 0,
            selectors: PageSelectors::default(),
        }
    }
}
