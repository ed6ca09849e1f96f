//! `reelharvest harvest <url>` — scroll a profile page and export its post links.

use crate::harvest::clock::SystemClock;
use crate::harvest::dom::{LivePage, ProfilePage};
use crate::harvest::export;
use crate::harvest::{HarvestConfig, HarvestSession};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use anyhow::{ensure, Context, Result};
use std::path::Path;
use tracing::info;

/// Run one harvesting session against a live profile page.
pub async fn run(
    url: &str,
    out_dir: &Path,
    config: HarvestConfig,
    timeout_ms: u64,
) -> Result<()> {
    let parsed = url::Url::parse(url).context("invalid profile URL")?;
    ensure!(
        matches!(parsed.scheme(), "http" | "https"),
        "profile URL must be http(s), got {}",
        parsed.scheme()
    );

    let renderer = ChromiumRenderer::new().await?;
    let mut ctx = renderer.new_context().await?;

    let nav = ctx.navigate(url, timeout_ms).await?;
    info!(url = %nav.final_url, load_ms = nav.load_time_ms, "page loaded");

    let selectors = config.selectors.clone();
    let mut session = HarvestSession::new(config);

    let (count, name, text) = {
        let page = LivePage::new(ctx.as_ref(), selectors);
        session.run(&page, &SystemClock).await?;

        let heading = page.heading_text().await?;
        let name = export::export_file_name(heading.as_deref());
        let text = export::serialize_links(session.links());
        (session.links().len(), name, text)
    };

    let path = export::write_export(out_dir, &name, &text)?;
    println!("Harvested {count} links -> {}", path.display());

    ctx.close().await?;
    renderer.shutdown().await?;
    Ok(())
}
