//! Package identifier patterns.
//!
//! Syntax:
//! - `..` matches any number of packages, including none
//!   (`..service..` matches `service`, `a.service` and `a.service.b`)
//! - `*` matches any sequence of identifier characters within one package
//! - `**` matches one or more whole packages
//! - `(...)` captures the enclosed part, used to name package slices
//!
//! Patterns always match the whole package name.

use miette::Diagnostic;
use regex::Regex;
use std::fmt;
use thiserror::Error;

const ANY_PACKAGES: &str = r"(?:(?:^\w*)?\.(?:\w+\.)*(?:\w*$)?)?";
const WHOLE_PACKAGES: &str = r"(?:\w+\.)*\w+";
const IDENTIFIER_PART: &str = r"\w*";

/// Error raised for malformed package patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("invalid package pattern `{pattern}`: {reason}")]
#[diagnostic(
    code(arch_conform::pattern),
    help("patterns use `..` for any packages, `*` within one package, and `(...)` for capture groups")
)]
pub struct PatternError {
    /// The pattern as written.
    pub pattern: String,
    /// Why it was rejected.
    pub reason: String,
}

impl PatternError {
    fn new(pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// A compiled package identifier pattern.
#[derive(Debug, Clone)]
pub struct PackagePattern {
    raw: String,
    regex: Regex,
    groups: usize,
}

impl PackagePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for empty patterns, unbalanced parentheses,
    /// or characters that cannot appear in a package name.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::new(pattern, "pattern is empty"));
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut regex = String::from("^");
        let mut depth = 0usize;
        let mut groups = 0usize;
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '.' if chars.get(i + 1) == Some(&'.') => {
                    if chars.get(i + 2) == Some(&'.') {
                        return Err(PatternError::new(pattern, "`...` is not allowed"));
                    }
                    regex.push_str(ANY_PACKAGES);
                    i += 1;
                }
                '.' => regex.push_str(r"\."),
                '*' if chars.get(i + 1) == Some(&'*') => {
                    regex.push_str(WHOLE_PACKAGES);
                    i += 1;
                }
                '*' => regex.push_str(IDENTIFIER_PART),
                '(' => {
                    depth += 1;
                    groups += 1;
                    regex.push('(');
                }
                ')' => {
                    if depth == 0 {
                        return Err(PatternError::new(pattern, "unbalanced `)`"));
                    }
                    depth -= 1;
                    regex.push(')');
                }
                c if c.is_alphanumeric() || c == '_' || c == '$' => {
                    regex.push_str(&regex::escape(&c.to_string()));
                }
                c => {
                    return Err(PatternError::new(
                        pattern,
                        format!("unexpected character `{c}`"),
                    ));
                }
            }
            i += 1;
        }
        if depth != 0 {
            return Err(PatternError::new(pattern, "unbalanced `(`"));
        }
        regex.push('$');

        let regex = Regex::new(&regex).map_err(|e| PatternError::new(pattern, e.to_string()))?;
        Ok(Self {
            raw: pattern.to_string(),
            regex,
            groups,
        })
    }

    /// Returns `true` if the whole package name matches.
    #[must_use]
    pub fn matches(&self, package: &str) -> bool {
        self.regex.is_match(package)
    }

    /// Returns the capture groups for a matching package, in order.
    #[must_use]
    pub fn captures(&self, package: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(package)?;
        Some(
            (1..=self.groups)
                .map(|i| caps.get(i).map_or(String::new(), |m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Number of capture groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PackagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compiles a list of patterns, failing on the first invalid one.
///
/// # Errors
///
/// Returns the first [`PatternError`].
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PackagePattern>, PatternError> {
    patterns
        .iter()
        .map(|p| PackagePattern::new(p.as_ref()))
        .collect()
}

/// Returns `true` if `package` equals `root` or is nested below it.
#[must_use]
pub fn is_within(package: &str, root: &str) -> bool {
    package == root
        || (package.starts_with(root) && package.as_bytes().get(root.len()) == Some(&b'.'))
}
