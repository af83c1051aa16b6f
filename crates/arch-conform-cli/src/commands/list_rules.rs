//! List rules command implementation.

use arch_conform_rules::{Preset, CATALOG};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<36} {:<10} Description", "Code", "Name", "Presets");
    println!("{}", "-".repeat(100));

    for rule in CATALOG {
        println!(
            "{:<8} {:<36} {:<10} {}",
            rule.code,
            rule.name,
            presets_of(rule.name),
            rule.description
        );
    }

    println!("\nPresets (M = minimal, S = standard, X = strict):");
    println!("  minimal   - rules that need no [project] options");
    println!("  standard  - the classic Spring checks (default)");
    println!("  strict    - every rule above");

    println!("\nDeclarative rules from arch-conform.toml:");
    println!("  ALD001    [[restrict-use]]    scope must not depend on denied packages");
    println!("  ALD002    [[naming]]          selected classes end with a suffix");
    println!("  ALD003    [[deny-scope-dep]]  scope must not depend on other scopes");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  arch-conform check --rules no-field-injection,entity-version-field");
    println!("  arch-conform check --rules AC001,AC002,AC015");
}

fn presets_of(name: &str) -> String {
    [
        (Preset::Minimal, 'M'),
        (Preset::Standard, 'S'),
        (Preset::Strict, 'X'),
    ]
    .iter()
    .filter(|(preset, _)| preset.contains(name))
    .map(|(_, tag)| *tag)
    .collect()
}
