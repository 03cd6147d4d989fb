//! Build script for weight table and configuration validation
//!
//! This script runs at compile time. It checks the shared weight profiles
//! and every JSON configuration under `config/` so a broken table or config
//! fails the build instead of producing a silently wrong mesh.

// Include the shared weight table
#[path = "src/weight_table.rs"]
#[allow(dead_code)]
mod weight_table;

use serde::Deserialize;
use std::fs;
use std::path::Path;
use weight_table::{DEGENERATE_PROFILE, WEIGHT_PROFILES};

/// Mirror of the runtime configuration with raw field types
#[derive(Debug, Deserialize)]
struct RawConfig {
    height: Option<i64>,
    radius: Option<f64>,
    bone_base_offset: Option<f64>,
    weight_case: Option<i64>,
}

/// Validate the weight profiles: every weight in [0, 1] and every
/// non-degenerate profile non-decreasing along the tube
fn validate_weight_table() -> Vec<String> {
    let mut errors = Vec::new();

    for (case, profile) in WEIGHT_PROFILES.iter().enumerate() {
        for (ring, &w) in profile.iter().enumerate() {
            if !(0.0..=1.0).contains(&w) {
                errors.push(format!(
                    "  Case {} ring {}: weight {:.3} outside [0, 1]",
                    case + 1,
                    ring,
                    w
                ));
            }
        }

        if case == DEGENERATE_PROFILE {
            continue;
        }
        for (ring, pair) in profile.windows(2).enumerate() {
            if pair[1] < pair[0] {
                errors.push(format!(
                    "  Case {} ring {}: weight drops from {:.3} to {:.3}",
                    case + 1,
                    ring + 1,
                    pair[0],
                    pair[1]
                ));
            }
        }
    }

    errors
}

/// Validate a configuration file
fn validate_config_file(path: &Path) -> Result<(), String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let config: RawConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    let mut errors = Vec::new();
    if let Some(height) = config.height {
        if height <= 0 {
            errors.push(format!("  height must be positive, got {}", height));
        }
    }
    if let Some(radius) = config.radius {
        if radius <= 0.0 {
            errors.push(format!("  radius must be positive, got {}", radius));
        }
    }
    if let Some(offset) = config.bone_base_offset {
        if !offset.is_finite() {
            errors.push(format!("  bone_base_offset must be finite, got {}", offset));
        }
    }
    if let Some(case) = config.weight_case {
        if !(1..=5).contains(&case) {
            // Accepted at runtime, falls back to case 1
            println!(
                "cargo:warning={}: weight_case {} will fall back to case 1",
                path.display(),
                case
            );
        }
    }

    if errors.is_empty() {
        println!("cargo:warning=✓ {} validated", path.display());
        Ok(())
    } else {
        Err(format!(
            "Config '{}' is invalid:\n{}",
            path.display(),
            errors.join("\n")
        ))
    }
}

fn main() {
    // Rerun if the shared table changes
    println!("cargo:rerun-if-changed=src/weight_table.rs");

    let mut has_errors = false;

    let table_errors = validate_weight_table();
    if table_errors.is_empty() {
        println!(
            "cargo:warning=✓ weight table validated ({} cases)",
            WEIGHT_PROFILES.len()
        );
    } else {
        println!(
            "cargo:warning=VALIDATION ERROR: weight table:\n{}",
            table_errors.join("\n")
        );
        has_errors = true;
    }

    let config_dir = Path::new("config");
    if config_dir.exists() {
        if let Ok(entries) = fs::read_dir(config_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    println!("cargo:rerun-if-changed={}", path.display());

                    if let Err(e) = validate_config_file(&path) {
                        println!("cargo:warning=VALIDATION ERROR: {}", e);
                        has_errors = true;
                    }
                }
            }
        }
        println!("cargo:rerun-if-changed={}", config_dir.display());
    } else {
        println!("cargo:warning=Config directory not found, skipping config validation");
    }

    if has_errors {
        panic!("Validation failed! Fix the weight table or config files.");
    }
}
