//! Environment readiness check.

use crate::renderer::chromium::find_chromium;
use anyhow::Result;

/// Check Chromium, yt-dlp, and ffmpeg availability.
pub async fn run() -> Result<()> {
    println!("Reelharvest Doctor");
    println!("==================");
    println!();

    // OS and architecture
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Chromium — required for `harvest`
    let chromium = find_chromium();
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => {
            println!("[!!] Chromium NOT found.");
            println!("     Install Chrome/Chromium, or point REELHARVEST_CHROMIUM_PATH at a binary,");
            println!("     or place one under ~/.reelharvest/chromium/");
        }
    }

    // yt-dlp — required for `download`
    match crate::download::find_yt_dlp() {
        Ok(path) => println!("[OK] yt-dlp found: {}", path.display()),
        Err(e) => println!("[!!] {e}"),
    }

    // ffmpeg — only needed for `download --audio`
    match crate::download::find_ffmpeg() {
        Ok(path) => println!("[OK] ffmpeg found: {}", path.display()),
        Err(e) => println!("[??] {e} (only needed for `download --audio`)"),
    }

    println!();
    if chromium.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
        println!("  `harvest` needs a Chromium binary.");
    }

    Ok(())
}
