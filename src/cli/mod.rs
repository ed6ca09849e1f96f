//! CLI subcommand implementations for the reelharvest binary.

pub mod doctor;
pub mod download_cmd;
pub mod harvest_cmd;
