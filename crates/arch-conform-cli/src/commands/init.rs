//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# arch-conform configuration

# Rule preset: "minimal", "standard" (default) or "strict"
preset = "standard"

# Minimum severity that fails the check: "info", "warning" or "error"
fail_on = "error"

[model]
# Code model snapshot(s), relative to this file (glob patterns allowed)
path = "build/arch-conform/*.json"

# Only check classes within these packages
# packages = ["com.example"]

# Package patterns to exclude
# exclude = ["..generated.."]

# Check test classes too
include_tests = false

[project]
# Packages holding JPA entities (required by no-rest-controller-entity-access)
entity_packages = ["com.example.domain"]

# Suffixes of DTO types returned by REST endpoints
dto_suffixes = ["Dto"]

# Utility class suffixes (default: Util, Utils)
# utility_suffixes = ["Util", "Utils", "Helper"]

root_package = "com.example"

# Slice patterns; the capture group names each slice
service_slices = "com.example.(*service).domain"
# layer_slices = "com.example.(*).."

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.constructor-arity]
enabled = true
# severity = "warning"  # Override default severity
max_parameters = 3

# [rules.rest-controller-name-suffix]
# suffix = "Resource"

# Declarative rules
#
# [[scopes]]
# name = "domain"
# packages = ["com.example..domain.."]
#
# [[restrict-use]]
# name = "no-web-in-domain"
# scope = "domain"
# deny = ["org.springframework.web.."]
# message = "Domain classes must not depend on the web layer."
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("arch-conform.toml");
    write_config(config_path, force)?;

    println!("Created arch-conform.toml");
    println!("\nNext steps:");
    println!("  1. Point [model].path at the code model snapshot of your build");
    println!("  2. Edit [project] to match your packages");
    println!("  3. Run: arch-conform check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
