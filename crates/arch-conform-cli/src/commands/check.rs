//! Check command implementation.

use anyhow::{Context, Result};
use arch_conform_core::model::loader;
use arch_conform_core::{declarative, Config, Evaluator, RuleBox, Severity};
use arch_conform_rules::{build_rules, Preset};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::CheckArgs;

/// Runs the check command.
///
/// Returns `false` when a rule fails at or above the `fail_on` severity.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<bool> {
    let (mut config, content, base) = load_config(&args.path, source)?;
    apply_overrides(&mut config, args);

    let fail_on = fail_on(&config)?;
    let rules = select_rules(&config, args.rules.as_deref(), &content)?;

    let evaluator = Evaluator::builder()
        .config(config.clone())
        .rules(rules)
        .build()
        .map_err(diagnostic)
        .context("Failed to build evaluator")?;

    let model = loader::load_model(&base, &config.model.path)
        .map_err(diagnostic)
        .with_context(|| {
            format!(
                "Failed to load model `{}` from {}",
                config.model.path,
                base.display()
            )
        })?;

    tracing::info!(
        "Evaluating {} rules against {} classes",
        evaluator.rule_count(),
        model.len()
    );

    let report = evaluator.evaluate(&model);
    super::output::print(&report, args.format, fail_on)?;

    Ok(report.is_success(fail_on))
}

/// Reads the resolved configuration.
///
/// Returns the parsed config, its raw text for the declarative sections, and
/// the directory the model path is relative to.
fn load_config(path: &Path, source: &ConfigSource) -> Result<(Config, String, PathBuf)> {
    let Some(p) = source.path() else {
        tracing::debug!("No config found, using defaults");
        return Ok((Config::default(), String::new(), source.model_base(path)));
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }

    let content = std::fs::read_to_string(p)
        .with_context(|| format!("Failed to read config: {}", p.display()))?;
    let config = Config::parse(&content)
        .map_err(diagnostic)
        .with_context(|| format!("Failed to load config: {}", p.display()))?;

    let base = source.model_base(path);
    Ok((config, content, base))
}

fn apply_overrides(config: &mut Config, args: &CheckArgs) {
    if let Some(model) = &args.model {
        config.model.path.clone_from(model);
    }
    if let Some(preset) = &args.preset {
        config.preset = Some(preset.clone());
    }
    if let Some(fail_on) = &args.fail_on {
        config.fail_on = Some(fail_on.clone());
    }
    config.model.exclude.extend(args.exclude.iter().cloned());
    if args.include_tests {
        config.model.include_tests = true;
    }
}

fn fail_on(config: &Config) -> Result<Severity> {
    Ok(config
        .fail_on_severity()
        .map_err(diagnostic)?
        .unwrap_or(Severity::Error))
}

/// Builds the catalog rules, by explicit filter or by preset, followed by the
/// declarative rules of the configuration file.
fn select_rules(config: &Config, filter: Option<&str>, content: &str) -> Result<Vec<RuleBox>> {
    let mut rules = if let Some(filter) = filter {
        let names: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        build_rules(&names, config).map_err(diagnostic)?
    } else {
        let preset = Preset::from_config(config).map_err(diagnostic)?;
        tracing::debug!(%preset, "Using preset");
        let names: Vec<&str> = preset
            .rule_names()
            .into_iter()
            .filter(|name| config.is_rule_enabled(name))
            .collect();
        build_rules(&names, config).map_err(diagnostic)?
    };

    let declared = declarative::load_rules_from_toml(content)
        .map_err(diagnostic)
        .context("Failed to load declarative rules")?;
    if !declared.is_empty() {
        tracing::debug!("Loaded {} declarative rules", declared.len());
    }
    rules.extend(declared);
    Ok(rules)
}

/// Renders a diagnostic with its code and help text.
fn diagnostic<E>(err: E) -> anyhow::Error
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    anyhow::anyhow!("{:?}", miette::Report::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    const MODEL: &str = r#"{
        "classes": [
            { "name": "com.acme.web.UserController", "annotations": [{ "name": "org.springframework.web.bind.annotation.RestController" }] },
            { "name": "com.acme.StringUtils", "constructors": [{ "modifiers": ["public"] }] }
        ]
    }"#;

    fn args(path: &Path) -> CheckArgs {
        CheckArgs {
            path: path.to_path_buf(),
            model: None,
            format: OutputFormat::Compact,
            rules: None,
            preset: None,
            fail_on: None,
            exclude: Vec::new(),
            include_tests: false,
        }
    }

    fn project(config: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("code-model.json"), MODEL).unwrap();
        fs::write(tmp.path().join("arch-conform.toml"), config).unwrap();
        tmp
    }

    fn source(tmp: &TempDir) -> ConfigSource {
        ConfigSource::Project(tmp.path().join("arch-conform.toml"))
    }

    #[test]
    fn selected_rules_fail_the_check() {
        let tmp = project("");
        let mut args = args(tmp.path());
        args.rules = Some("rest-controller-name-suffix, AC009".into());

        assert!(!run(&args, &source(&tmp)).unwrap());
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let tmp = project(
            "preset = \"minimal\"\n\
             [rules.rest-controller-name-suffix]\nenabled = false\n\
             [rules.utility-private-constructor]\nenabled = false\n",
        );

        assert!(run(&args(tmp.path()), &source(&tmp)).unwrap());
    }

    #[test]
    fn fail_on_threshold_controls_the_outcome() {
        let tmp = project(
            "[rules.rest-controller-name-suffix]\nseverity = \"info\"\n",
        );
        let mut args = args(tmp.path());
        args.rules = Some("AC005".into());
        assert!(run(&args, &source(&tmp)).unwrap());

        args.fail_on = Some("info".into());
        assert!(!run(&args, &source(&tmp)).unwrap());
    }

    #[test]
    fn standard_preset_without_project_options_is_a_config_error() {
        let tmp = project("");
        let err = run(&args(tmp.path()), &source(&tmp)).unwrap_err();
        assert!(format!("{err:?}").contains("entity_packages"));
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let tmp = project("");
        let mut args = args(tmp.path());
        args.rules = Some("no-such-rule".into());
        assert!(run(&args, &source(&tmp)).is_err());
    }

    #[test]
    fn missing_model_is_an_error() {
        let tmp = project("[model]\npath = \"missing/*.json\"\n");
        let mut args = args(tmp.path());
        args.rules = Some("AC005".into());
        assert!(run(&args, &source(&tmp)).is_err());
    }

    #[test]
    fn declarative_rules_run_next_to_catalog_rules() {
        let tmp = project(
            "preset = \"minimal\"\n\
             [rules.rest-controller-name-suffix]\nenabled = false\n\
             [rules.utility-private-constructor]\nenabled = false\n\
             [[naming]]\nname = \"controllers-end-with-resource\"\n\
             packages = [\"com.acme..\"]\n\
             annotated_with = \"org.springframework.web.bind.annotation.RestController\"\n\
             suffix = \"Resource\"\n\
             message = \"REST controllers end with Resource\"\n",
        );
        let mut args = args(tmp.path());
        assert!(run(&args, &source(&tmp)).unwrap());

        args.fail_on = Some("warning".into());
        assert!(!run(&args, &source(&tmp)).unwrap());
    }

    #[test]
    fn model_path_resolves_against_config_directory() {
        let tmp = project("");
        let elsewhere = TempDir::new().unwrap();
        let mut args = args(elsewhere.path());
        args.rules = Some("AC005".into());

        assert!(!run(&args, &source(&tmp)).unwrap());
    }
}
