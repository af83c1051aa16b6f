//! Internal runner for `architecture_tests!()` macro integration.
//!
//! This module is `#[doc(hidden)]` and not part of the public API.
//! It is called by the test functions generated by
//! `arch_conform::architecture_tests!()`.

use arch_conform_core::model::{loader, CodeModel};
use arch_conform_core::{Config, Evaluator, Report, RuleBox, Severity};
use arch_conform_rules::Preset;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["arch-conform.toml", ".arch-conform.toml"];

/// Arguments captured by the generated tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Config file relative to the workspace root.
    pub config: Option<&'static str>,
    /// Preset override.
    pub preset: Option<&'static str>,
    /// Failure threshold override.
    pub fail_on: Option<&'static str>,
    /// Whether the rules were listed explicitly, bypassing the preset.
    pub listed: bool,
}

/// Configuration shared by one generated test.
struct Setup {
    /// Directory the model path is resolved against.
    base: PathBuf,
    content: String,
    config: Config,
}

impl Setup {
    fn load(options: &RunOptions) -> Self {
        let root = find_project_root();
        let (content, base) = read_config_content(&root, options.config);
        let config = parse_config(&content);
        Self {
            base,
            content,
            config,
        }
    }
}

/// Runs one catalog rule as part of `cargo test`.
///
/// # Panics
///
/// Panics with the rule's assertion message if it is violated at or above
/// the `fail_on` severity, or if the rule, configuration or model cannot be
/// loaded.
pub fn run_rule(name: &str, options: &RunOptions) {
    let Setup { base, config, .. } = Setup::load(options);

    if !config.is_rule_enabled(name) {
        tracing::debug!(rule = name, "Rule disabled in configuration");
        return;
    }
    if !options.listed {
        let preset = resolve_preset(options.preset, &config);
        if !preset.contains(name) {
            tracing::debug!(rule = name, %preset, "Rule not in preset");
            return;
        }
    }

    let fail_on = resolve_fail_on(options.fail_on, &config);
    let rule = arch_conform_rules::build_rule(name, &config).unwrap_or_else(|e| {
        panic!("arch-conform: rule `{name}` is misconfigured: {e}");
    });
    let model = cached_model(&base, &config.model.path);
    let report = evaluate(config, vec![rule], &model);

    if !report.is_success(fail_on) {
        let message = report
            .format_rule_assertion(name)
            .unwrap_or_else(|| report.format_test_report(fail_on));
        panic!("{message}");
    }
}

/// Runs the declarative rules of the configuration as part of `cargo test`.
///
/// # Panics
///
/// Panics with a formatted report if violations at or above `fail_on` are
/// found, or if the declarative sections are invalid.
pub fn run_declarative(options: &RunOptions) {
    let Setup {
        base,
        content,
        config,
    } = Setup::load(options);

    let rules = load_declarative_rules(&content);
    if rules.is_empty() {
        return;
    }

    let fail_on = resolve_fail_on(options.fail_on, &config);
    let model = cached_model(&base, &config.model.path);
    let report = evaluate(config, rules, &model);

    if !report.is_success(fail_on) {
        panic!("{}", report.format_test_report(fail_on));
    }
}

fn evaluate(config: Config, rules: Vec<RuleBox>, model: &CodeModel) -> Report {
    Evaluator::builder()
        .config(config)
        .rules(rules)
        .sequential(true)
        .build()
        .unwrap_or_else(|e| panic!("arch-conform: invalid [model] scope: {e}"))
        .evaluate(model)
}

/// Loads the model once per snapshot pattern and test binary.
fn cached_model(base: &Path, pattern: &str) -> Arc<CodeModel> {
    static MODELS: OnceLock<Mutex<HashMap<PathBuf, Arc<CodeModel>>>> = OnceLock::new();

    let key = base.join(pattern);
    let models = MODELS.get_or_init(Mutex::default);
    if let Some(model) = models
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(model);
    }

    let model = Arc::new(loader::load_model(base, pattern).unwrap_or_else(|e| {
        panic!(
            "arch-conform: failed to load code model `{}`: {e}",
            key.display()
        );
    }));
    models
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert(model)
        .clone()
}

/// Reads the config file, returning its content with the directory that
/// relative model paths resolve against.
///
/// Without a config file the content is empty and `root` is the base.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> (String, PathBuf) {
    let path = match explicit_path {
        Some(path) => Some(root.join(path)),
        None => CONFIG_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file()),
    };
    let Some(path) = path else {
        return (String::new(), root.to_path_buf());
    };

    let content = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!("arch-conform: cannot read {}: {e}", path.display());
    });
    let base = path
        .parent()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    (content, base)
}

fn parse_config(content: &str) -> Config {
    if content.trim().is_empty() {
        return Config::default();
    }
    Config::parse(content).unwrap_or_else(|e| panic!("arch-conform: invalid config: {e}"))
}

/// Builds the declarative rules of the config, if it declares any.
fn load_declarative_rules(content: &str) -> Vec<RuleBox> {
    if content.trim().is_empty() {
        return Vec::new();
    }
    arch_conform_core::declarative::load_rules_from_toml(content)
        .unwrap_or_else(|e| panic!("arch-conform: invalid declarative rules: {e}"))
}

/// Directory holding the config: the nearest ancestor of the test crate
/// whose `Cargo.toml` declares `[workspace]`, else the test crate itself.
fn find_project_root() -> PathBuf {
    let Some(manifest_dir) = std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    };
    manifest_dir
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map_or_else(|| manifest_dir.clone(), Path::to_path_buf)
}

fn declares_workspace(cargo_toml: &Path) -> bool {
    std::fs::read_to_string(cargo_toml)
        .ok()
        .and_then(|content| content.parse::<toml::Table>().ok())
        .is_some_and(|table| table.contains_key("workspace"))
}

/// Resolves the effective preset from macro arg > config > default.
fn resolve_preset(macro_arg: Option<&str>, config: &Config) -> Preset {
    let resolved = match macro_arg {
        Some(name) => name.parse(),
        None => Preset::from_config(config),
    };
    resolved.unwrap_or_else(|e| {
        panic!("arch-conform: {e}. Valid presets: minimal, standard, strict")
    })
}

/// Resolves the effective `fail_on` severity.
///
/// Priority: explicit macro arg > config file > default ("error").
fn resolve_fail_on(macro_arg: Option<&str>, config: &Config) -> Severity {
    let name = macro_arg.or(config.fail_on.as_deref()).unwrap_or("error");
    name.parse().unwrap_or_else(|e| panic!("arch-conform: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(preset: Option<&str>, fail_on: Option<&str>) -> Config {
        let mut config = Config::default();
        config.preset = preset.map(str::to_string);
        config.fail_on = fail_on.map(str::to_string);
        config
    }

    #[test]
    fn preset_prefers_macro_argument_over_config() {
        assert_eq!(resolve_preset(None, &config(None, None)), Preset::Standard);
        assert_eq!(resolve_preset(None, &config(Some("strict"), None)), Preset::Strict);
        assert_eq!(
            resolve_preset(Some("minimal"), &config(Some("strict"), None)),
            Preset::Minimal
        );
    }

    #[test]
    #[should_panic(expected = "unknown preset")]
    fn unknown_preset_panics() {
        resolve_preset(Some("lenient"), &Config::default());
    }

    #[test]
    fn fail_on_prefers_macro_argument_over_config() {
        assert_eq!(resolve_fail_on(None, &config(None, None)), Severity::Error);
        assert_eq!(
            resolve_fail_on(None, &config(None, Some("warning"))),
            Severity::Warning
        );
        assert_eq!(
            resolve_fail_on(Some("error"), &config(None, Some("info"))),
            Severity::Error
        );
    }

    #[test]
    #[should_panic(expected = "unknown severity")]
    fn unknown_fail_on_panics() {
        resolve_fail_on(Some("critical"), &Config::default());
    }

    // ── Config discovery ──

    #[test]
    fn read_config_content_finds_hidden_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".arch-conform.toml"), "preset = \"minimal\"\n").unwrap();

        let (content, base) = read_config_content(dir.path(), None);
        assert!(content.contains("minimal"));
        assert_eq!(base, dir.path());
    }

    #[test]
    fn read_config_content_resolves_base_of_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("demo")).unwrap();
        fs::write(dir.path().join("demo/arch-conform.toml"), "").unwrap();

        let (content, base) = read_config_content(dir.path(), Some("demo/arch-conform.toml"));
        assert!(content.is_empty());
        assert_eq!(base, dir.path().join("demo"));
    }

    #[test]
    fn read_config_content_without_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (content, base) = read_config_content(dir.path(), None);
        assert!(content.is_empty());
        assert_eq!(base, dir.path());
    }

    #[test]
    fn cached_model_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("code-model.json");
        fs::write(&snapshot, r#"{"classes": [{"name": "com.example.A"}]}"#).unwrap();

        let first = cached_model(dir.path(), "code-model.json");
        fs::remove_file(&snapshot).unwrap();
        let second = cached_model(dir.path(), "code-model.json");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    // ── Declarative rules loading ──

    #[test]
    fn load_declarative_rules_empty_content() {
        let rules = load_declarative_rules("");
        assert!(rules.is_empty());
    }

    #[test]
    fn load_declarative_rules_no_declarative_sections() {
        let toml = r#"
preset = "standard"
fail_on = "error"
"#;
        let rules = load_declarative_rules(toml);
        assert!(rules.is_empty());
    }

    #[test]
    fn load_declarative_rules_creates_all_rule_types() {
        let toml = r#"
[[scopes]]
name = "domain"
packages = ["com.example.demo.domain.."]

[[scopes]]
name = "web"
packages = ["com.example.demo.web.."]

[[restrict-use]]
name = "no-hibernate"
scope = "domain"
deny = ["org.hibernate.."]
message = "No Hibernate API in the domain."

[[naming]]
name = "services"
annotated_with = "org.springframework.stereotype.Service"
suffix = "Service"
message = "Services end with Service."

[[deny-scope-dep]]
from = "domain"
to = ["web"]
message = "Domain must not depend on web."
"#;
        let rules = load_declarative_rules(toml);
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["restrict-use", "naming", "deny-scope-dep"]);
    }

    #[test]
    #[should_panic(expected = "invalid declarative rules")]
    fn load_declarative_rules_unknown_scope_panics() {
        let toml = r#"
[[deny-scope-dep]]
from = "domain"
to = ["web"]
message = "Domain must not depend on web."
"#;
        load_declarative_rules(toml);
    }

    #[test]
    fn parse_config_ignores_declarative_sections() {
        let toml = r#"
preset = "minimal"

[[scopes]]
name = "domain"
packages = ["com.example.demo.domain.."]
"#;
        let config = parse_config(toml);
        assert_eq!(config.preset.as_deref(), Some("minimal"));
    }
}
