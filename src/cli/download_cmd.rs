//! `reelharvest download <links-file>` — feed an exported links file to yt-dlp.

use crate::download::{self, DownloadPlan};
use anyhow::Result;
use std::path::PathBuf;

pub async fn run(
    links_file: PathBuf,
    out_dir: PathBuf,
    audio: bool,
    audio_dir: PathBuf,
) -> Result<()> {
    let plan = DownloadPlan {
        links_file,
        video_dir: out_dir.join("videos"),
        audio_dir,
        audio,
    };

    let summary = download::run(&plan).await?;

    println!(
        "Downloaded {}/{} videos ({} failed) -> {}",
        summary.downloaded,
        summary.total,
        summary.failed,
        plan.video_dir.display()
    );
    if audio {
        println!(
            "Extracted {} audio files -> {}",
            summary.converted,
            plan.audio_dir.display()
        );
    }
    Ok(())
}
