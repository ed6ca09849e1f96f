// Copyright 2026 Reelharvest Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use reelharvest::cli;
use reelharvest::harvest::{HarvestConfig, PageSelectors};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reelharvest",
    about = "Reelharvest — scroll a profile page in headless Chromium, harvest post links, export them",
    version,
    after_help = "Run 'reelharvest <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll a profile page and export its post links as a .txt file
    Harvest {
        /// Profile URL to harvest (e.g. "https://www.tiktok.com/@somebody")
        url: String,
        /// Directory the exported links file is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Matched anchors kept in the DOM after each extraction pass
        #[arg(long, default_value_t = 20)]
        keep_tail: usize,
        /// Safety cap on harvest cycles (0 = run until the feed is exhausted)
        #[arg(long, default_value_t = 0)]
        max_cycles: u32,
        /// Navigation timeout in milliseconds
        #[arg(long, default_value_t = 30_000)]
        timeout: u64,
        /// CSS selector for post anchors
        #[arg(long)]
        anchor_selector: Option<String>,
        /// CSS selector for the loading indicator
        #[arg(long)]
        spinner_selector: Option<String>,
        /// CSS selector for the heading that names the export file
        #[arg(long)]
        heading_selector: Option<String>,
    },
    /// Download every URL in an exported links file with yt-dlp
    Download {
        /// Links file produced by `reelharvest harvest`
        links_file: PathBuf,
        /// Directory for downloads (videos land in <out-dir>/videos)
        #[arg(long, default_value = "downloads")]
        out_dir: PathBuf,
        /// Also extract WAV audio with ffmpeg
        #[arg(long)]
        audio: bool,
        /// Directory for extracted audio files
        #[arg(long, default_value = "audio")]
        audio_dir: PathBuf,
    },
    /// Check environment readiness (Chromium, yt-dlp, ffmpeg)
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "reelharvest=debug"
    } else if cli.quiet {
        "reelharvest=error"
    } else {
        "reelharvest=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Harvest {
            url,
            out_dir,
            keep_tail,
            max_cycles,
            timeout,
            anchor_selector,
            spinner_selector,
            heading_selector,
        } => {
            let defaults = PageSelectors::default();
            let config = HarvestConfig {
                keep_tail,
                max_cycles,
                selectors: PageSelectors {
                    post_anchor: anchor_selector.unwrap_or(defaults.post_anchor),
                    spinner: spinner_selector.unwrap_or(defaults.spinner),
                    heading: heading_selector.unwrap_or(defaults.heading),
                },
            };
            cli::harvest_cmd::run(&url, &out_dir, config, timeout).await
        }
        Commands::Download {
            links_file,
            out_dir,
            audio,
            audio_dir,
        } => cli::download_cmd::run(links_file, out_dir, audio, audio_dir).await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "reelharvest", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
