//! # arch-conform
//!
//! Architecture conformance rules for Spring-style JVM applications,
//! evaluated against a code model snapshot.
//!
//! This is the main facade crate that re-exports core functionality, macros, and rules.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! arch-conform = "0.3"
//! ```
//!
//! ```rust,ignore
//! // tests/architecture.rs
//! arch_conform::architecture_tests!(config = "arch-conform.toml");
//! ```
//!
//! Each catalog rule becomes its own test case. Configure the model path,
//! project options and preset in `arch-conform.toml`.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use arch_conform::model::loader;
//! use arch_conform::rules::Preset;
//! use arch_conform::{Config, Evaluator};
//!
//! let config = Config::from_file("arch-conform.toml".as_ref())?;
//! let model = loader::load_model(".".as_ref(), &config.model.path)?;
//! let evaluator = Evaluator::builder()
//!     .rules(Preset::from_config(&config)?.rules(&config)?)
//!     .config(config)
//!     .build()?;
//!
//! let report = evaluator.evaluate(&model);
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use arch_conform_core::*;

// Re-export the test generator for arch_conform::architecture_tests!()
pub use arch_conform_macros::architecture_tests;

/// Built-in rules, the catalog and presets.
pub mod rules {
    pub use arch_conform_rules::*;
}

mod runner;

#[doc(hidden)]
pub mod __internal {
    pub use crate::runner::{run_declarative, run_rule, RunOptions};
}
