// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `frost config` command - Show the effective configuration.

use std::path::PathBuf;

use frost_core::config::ConfigLoader;
use frost_core::FrostConfig;

pub fn execute(
    config: &FrostConfig,
    source: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = source
        .map(PathBuf::from)
        .unwrap_or_else(ConfigLoader::config_path);
    tracing::info!(path = %path.display(), "Showing configuration");

    println!("Frost Configuration:");
    println!("  Config Path:     {}", path.display());
    println!(
        "  Time Precision:  {} ({})",
        config.time_precision,
        config.time_precision.unit()
    );
    println!("  Logging Level:   {}", config.logging_level);
    Ok(())
}
