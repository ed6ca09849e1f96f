//! The DOM surface one harvesting session reads and writes.
//!
//! `ProfilePage` is the seam between the cycle state machine and the live
//! browser: the machine sees heights, hrefs and a spinner flag, never the
//! `RenderContext` underneath. Tests implement it in memory.

use super::PageSelectors;
use crate::renderer::RenderContext;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Read/write surface of the profile page being harvested.
#[async_trait]
pub trait ProfilePage: Send + Sync {
    /// Full document height in pixels.
    async fn document_height(&self) -> Result<i64>;
    /// Browser window height in pixels.
    async fn viewport_height(&self) -> Result<i64>;
    /// Smooth-scroll the page to a vertical offset.
    async fn scroll_to(&self, offset: i64) -> Result<()>;
    /// Absolute hrefs of all matched post anchors, in document order.
    ///
    /// An anchor whose href could not be read comes back as an empty string;
    /// the caller decides how to report it.
    async fn matched_hrefs(&self) -> Result<Vec<String>>;
    /// Remove matched anchors from the document, keeping only the most
    /// recently encountered `keep_tail`. Returns how many were removed.
    async fn prune_matched(&self, keep_tail: usize) -> Result<usize>;
    /// Whether the loading indicator is present in the DOM.
    async fn spinner_present(&self) -> Result<bool>;
    /// Trimmed text of the page heading, if the page has one.
    async fn heading_text(&self) -> Result<Option<String>>;
}

/// `ProfilePage` over a live browser context, built from small JS snippets.
pub struct LivePage<'a> {
    ctx: &'a dyn RenderContext,
    selectors: PageSelectors,
}

impl<'a> LivePage<'a> {
    pub fn new(ctx: &'a dyn RenderContext, selectors: PageSelectors) -> Self {
        Self { ctx, selectors }
    }
}

/// Quote a selector as a JS string literal. JSON string syntax is valid JS,
/// so this also escapes anything hostile inside a user-supplied selector.
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[async_trait]
impl ProfilePage for LivePage<'_> {
    async fn document_height(&self) -> Result<i64> {
        self.ctx
            .execute_js("document.body.scrollHeight")
            .await?
            .as_i64()
            .context("document height was not a number")
    }

    async fn viewport_height(&self) -> Result<i64> {
        // outerHeight, not innerHeight: scrolling to scrollHeight - outerHeight
        // lands slightly above the fold, which is what retriggers the feed.
        self.ctx
            .execute_js("window.outerHeight")
            .await?
            .as_i64()
            .context("viewport height was not a number")
    }

    async fn scroll_to(&self, offset: i64) -> Result<()> {
        let script = format!(
            "(() => {{ window.scrollTo({{ top: {offset}, behavior: 'smooth' }}); return true; }})()"
        );
        self.ctx.execute_js(&script).await?;
        Ok(())
    }

    async fn matched_hrefs(&self) -> Result<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({sel})).map(a => a.href ?? '')",
            sel = js_str(&self.selectors.post_anchor)
        );
        let value = self.ctx.execute_js(&script).await?;
        let items = value
            .as_array()
            .context("matched anchors did not evaluate to an array")?;
        Ok(items
            .iter()
            .map(|v| v.as_str().unwrap_or("").to_string())
            .collect())
    }

    async fn prune_matched(&self, keep_tail: usize) -> Result<usize> {
        let script = format!(
            "(() => {{\
               const items = Array.from(document.querySelectorAll({sel}));\
               const cut = Math.max(items.length - {keep_tail}, 0);\
               for (const item of items.slice(0, cut)) item.remove();\
               return cut;\
             }})()",
            sel = js_str(&self.selectors.post_anchor)
        );
        let removed = self
            .ctx
            .execute_js(&script)
            .await?
            .as_u64()
            .context("prune count was not a number")?;
        Ok(removed as usize)
    }

    async fn spinner_present(&self) -> Result<bool> {
        let script = format!(
            "document.querySelector({sel}) !== null",
            sel = js_str(&self.selectors.spinner)
        );
        self.ctx
            .execute_js(&script)
            .await?
            .as_bool()
            .context("spinner check did not evaluate to a boolean")
    }

    async fn heading_text(&self) -> Result<Option<String>> {
        let script = format!(
            "(() => {{\
               const h = document.querySelector({sel});\
               const t = h && h.textContent ? h.textContent.trim() : '';\
               return t === '' ? null : t;\
             }})()",
            sel = js_str(&self.selectors.heading)
        );
        let value = self.ctx.execute_js(&script).await?;
        Ok(value.as_str().map(str::to_string))
    }
}
