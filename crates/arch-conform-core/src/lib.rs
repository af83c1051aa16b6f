//! # arch-conform-core
//!
//! Core framework for architecture conformance checks over a code model
//! of a JVM application.
//!
//! This crate provides the foundational traits and types for building
//! conformance rules. It includes:
//!
//! - [`model::CodeModel`], the immutable model of classes, members and accesses
//! - [`Rule`] trait for rules evaluated against the model
//! - [`Evaluator`] for running rules with panic isolation
//! - [`Report`] and [`Violation`] for representing findings
//! - [`packages`] and [`slices`] for package patterns and slice cycles
//!
//! ## Example
//!
//! ```ignore
//! use arch_conform_core::{model::loader, Evaluator, Severity};
//!
//! let model = loader::load_model(".".as_ref(), "code-model.json")?;
//! let evaluator = Evaluator::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let report = evaluator.evaluate(&model);
//! report.print_report();
//! assert!(report.is_success(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod evaluator;
mod rule;
mod types;

pub mod declarative;
pub mod model;
pub mod packages;
pub mod predicate;
pub mod slices;

pub use config::{Config, ConfigError, ModelConfig, ProjectConfig, RuleConfig};
pub use context::{EvaluationContext, ModelScope};
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use rule::{list_or_default, require_list, Rule, RuleBox, RuleConfigError};
pub use types::{Report, RuleOutcome, RuleReport, Severity, UnitKind, UnitRef, Violation};
