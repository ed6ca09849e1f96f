// Copyright 2026 Reelharvest Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reelharvest library — drive a headless browser over a social-media
//! profile page, harvest post links while the feed loads, and export them.
//!
//! This library crate exposes the core modules for integration testing.

pub mod cli;
pub mod download;
pub mod harvest;
pub mod renderer;
