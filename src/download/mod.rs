//! Bulk download of an exported links file via yt-dlp.
//!
//! Consumes the one-URL-per-line format produced by `harvest`. Each video
//! lands in `<out>/videos/` under an indexed name; with `--audio`, ffmpeg
//! extracts a 44.1 kHz stereo WAV alongside. A failed URL is logged and
//! counted, never fatal.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

/// A required external tool is missing or misbehaved.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} not found on PATH. {hint}")]
    Missing { tool: &'static str, hint: &'static str },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// What one `download` invocation should do.
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    /// Links file produced by a harvest session.
    pub links_file: PathBuf,
    /// Where downloaded videos go.
    pub video_dir: PathBuf,
    /// Where extracted WAV files go.
    pub audio_dir: PathBuf,
    /// Whether to extract audio at all.
    pub audio: bool,
}

/// Tallies for the end-of-run summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownloadSummary {
    pub total: usize,
    pub downloaded: usize,
    pub converted: usize,
    pub failed: usize,
}

/// Extensions yt-dlp is expected to produce for video output.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

fn post_url_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            // Canonical post URL; photo posts are harvested too, so both kinds
            // are accepted here.
            Regex::new(r"^https?://(www\.)?tiktok\.com/@[\w.-]+/(video|photo)/\d+").unwrap(),
            // Short links
            Regex::new(r"^https?://(vm|vt)\.tiktok\.com/[\w\d]+").unwrap(),
            Regex::new(r"^https?://(www\.)?tiktok\.com/t/[\w\d]+").unwrap(),
        ]
    })
}

/// Whether a line from the links file looks like a post we can download.
pub fn is_valid_post_url(url: &str) -> bool {
    post_url_patterns().iter().any(|re| re.is_match(url))
}

/// Read the links file, keeping valid post URLs in file order.
/// Invalid lines are logged and dropped.
pub fn read_urls(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read links file {}", path.display()))?;

    let mut urls = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_valid_post_url(line) {
            urls.push(line.to_string());
        } else {
            warn!(url = line, "not a recognized post URL, skipping");
        }
    }
    info!(valid = urls.len(), "links file read");
    Ok(urls)
}

pub fn find_yt_dlp() -> Result<PathBuf, ToolError> {
    which::which("yt-dlp").map_err(|_| ToolError::Missing {
        tool: "yt-dlp",
        hint: "Install with: pip install yt-dlp",
    })
}

pub fn find_ffmpeg() -> Result<PathBuf, ToolError> {
    which::which("ffmpeg").map_err(|_| ToolError::Missing {
        tool: "ffmpeg",
        hint: "Install ffmpeg from your package manager",
    })
}

/// Run the whole pipeline over the plan's links file.
pub async fn run(plan: &DownloadPlan) -> Result<DownloadSummary> {
    let urls = read_urls(&plan.links_file)?;
    if urls.is_empty() {
        bail!("no valid post URLs in {}", plan.links_file.display());
    }

    let yt_dlp = find_yt_dlp()?;
    let ffmpeg = if plan.audio {
        Some(find_ffmpeg()?)
    } else {
        None
    };

    std::fs::create_dir_all(&plan.video_dir)?;
    if plan.audio {
        std::fs::create_dir_all(&plan.audio_dir)?;
    }

    let bar = ProgressBar::new(urls.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .expect("static template must parse"),
    );

    let mut summary = DownloadSummary {
        total: urls.len(),
        ..DownloadSummary::default()
    };

    for (i, url) in urls.iter().enumerate() {
        let index = i + 1;
        bar.set_message(format!("video {index}"));

        match download_one(&yt_dlp, url, index, &plan.video_dir).await {
            Ok(video) => {
                summary.downloaded += 1;
                info!(index, url = url.as_str(), "downloaded");

                if let Some(ffmpeg) = &ffmpeg {
                    match convert_to_wav(ffmpeg, &video, index, &plan.audio_dir).await {
                        Ok(audio) => {
                            summary.converted += 1;
                            info!(index, path = %audio.display(), "audio extracted");
                        }
                        Err(e) => warn!(index, error = %e, "audio extraction failed"),
                    }
                }
            }
            Err(e) => {
                summary.failed += 1;
                warn!(index, url = url.as_str(), error = %e, "download failed");
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    info!(
        total = summary.total,
        downloaded = summary.downloaded,
        converted = summary.converted,
        failed = summary.failed,
        "download run complete"
    );
    Ok(summary)
}

/// Download a single post and return the path of the resulting video file.
async fn download_one(
    yt_dlp: &Path,
    url: &str,
    index: usize,
    video_dir: &Path,
) -> Result<PathBuf> {
    let template = video_dir.join(format!("tiktok_{index:03}_%(id)s.%(ext)s"));

    let output = Command::new(yt_dlp)
        .arg("--no-warnings")
        .arg("-f")
        .arg("best/worst")
        .arg("-o")
        .arg(&template)
        .arg(url)
        .output()
        .await
        .context("failed to spawn yt-dlp")?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: "yt-dlp",
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    find_downloaded(video_dir, index)
        .with_context(|| format!("yt-dlp succeeded but no output file found for video {index}"))
}

/// Locate the file yt-dlp wrote for `index`; the extension depends on the
/// source format, so match on the indexed prefix.
fn find_downloaded(video_dir: &Path, index: usize) -> Option<PathBuf> {
    let prefix = format!("tiktok_{index:03}_");
    let entries = std::fs::read_dir(video_dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let ext = p.extension().and_then(|x| x.to_str()).unwrap_or("");
            name.starts_with(&prefix) && VIDEO_EXTENSIONS.contains(&ext)
        })
}

/// Extract the audio track as 44.1 kHz stereo PCM WAV.
async fn convert_to_wav(
    ffmpeg: &Path,
    video: &Path,
    index: usize,
    audio_dir: &Path,
) -> Result<PathBuf> {
    let audio_path = audio_dir.join(format!("tiktok_{index:03}_audio.wav"));

    let output = Command::new(ffmpeg)
        .arg("-i")
        .arg(video)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("44100")
        .arg("-ac")
        .arg("2")
        .arg("-y")
        .arg(&audio_path)
        .output()
        .await
        .context("failed to spawn ffmpeg")?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: "ffmpeg",
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(audio_path)
}
