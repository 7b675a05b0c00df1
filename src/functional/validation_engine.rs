//! Result Aggregator
//!
//! Runs a composed evaluator chain against one value and collects every
//! violation, in evaluator order, into a [`ValidationOutcome`].

use std::collections::HashMap;
use std::path::Path;

use itertools::Itertools;
use serde_derive::Serialize;

use crate::constants;
use crate::functional::validation_rules::{ConstraintKind, EvaluationContext, Evaluator, Violation};

/// Validation pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Stop on first violation
    pub fail_fast: bool,
    /// Maximum number of violations to collect per field
    pub max_errors: Option<usize>,
}

impl Default for ValidationConfig {
    /// Collects every violation: `fail_fast = false`, `max_errors = None`.
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_errors: None,
        }
    }
}

impl ValidationConfig {
    /// Reads `VALIDATION_FAIL_FAST` and `VALIDATION_MAX_ERRORS` from the process
    /// environment, after loading a `.env` file if one exists.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration from a dotenv-style file without touching the
    /// process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, dotenv::Error> {
        #[allow(deprecated)]
        let iter = dotenv::from_path_iter(path.as_ref())?;
        let vars: HashMap<String, String> = iter.collect::<Result<_, _>>()?;
        Ok(Self::from_lookup(|key| vars.get(key).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let fail_fast = lookup(constants::ENV_FAIL_FAST)
            .and_then(|v| match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" => Some(false),
                _ => None,
            })
            .unwrap_or(defaults.fail_fast);

        let max_errors = lookup(constants::ENV_MAX_ERRORS)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|max| *max > 0)
            .or(defaults.max_errors);

        Self {
            fail_fast,
            max_errors,
        }
    }
}

/// Aggregate result of checking one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationOutcome {
    pub fn success() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
        }
    }

    /// An empty violation list is still a success.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Bare messages, in evaluator order.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    /// Messages prefixed with the humanized field name.
    pub fn full_messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::full_message).collect()
    }

    pub fn has_kind(&self, kind: ConstraintKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Violations grouped by the constraint kind that produced them.
    pub fn by_kind(&self) -> HashMap<ConstraintKind, Vec<&Violation>> {
        self.violations.iter().into_group_map_by(|v| v.kind)
    }

    /// Merges another outcome into this one, keeping violation order.
    pub fn combine(mut self, other: ValidationOutcome) -> Self {
        self.violations.extend(other.violations);
        self.valid = self.valid && other.valid;
        self
    }
}

/// Evaluator-chain runner.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Runs every evaluator against `value` and collects all violations.
    ///
    /// Honors `fail_fast` and `max_errors`; with the default configuration no
    /// evaluator is skipped.
    pub fn evaluate<I>(
        &self,
        value: Option<&str>,
        ctx: &EvaluationContext<'_>,
        evaluators: I,
    ) -> ValidationOutcome
    where
        I: IntoIterator,
        I::Item: Evaluator,
    {
        let mut violations = Vec::new();

        for evaluator in evaluators {
            let Some(violation) = evaluator.check(value, ctx) else {
                continue;
            };
            violations.push(violation);

            if self.config.fail_fast {
                break;
            }
            if let Some(max) = self.config.max_errors {
                if violations.len() >= max {
                    break;
                }
            }
        }

        tracing::trace!(
            field = ctx.field,
            violations = violations.len(),
            "evaluated field"
        );

        ValidationOutcome::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::validation_rules::{LengthEvaluator, PatternEvaluator};
    use crate::models::format_rule::{LengthConstraint, PatternSpec};

    fn chain() -> Vec<Box<dyn Evaluator>> {
        vec![
            Box::new(LengthEvaluator::new(LengthConstraint::Maximum(5))),
            Box::new(PatternEvaluator::new(
                PatternSpec::new("zipcode", "[0-9]{5}", "must contain 5 numbers").unwrap(),
            )),
        ]
    }

    #[test]
    fn test_collects_every_violation_in_order() {
        let engine = ValidationEngine::new();
        let ctx = EvaluationContext::new("zip");
        let outcome = engine.evaluate(Some("abcdefg"), &ctx, chain().iter());

        assert!(!outcome.is_valid());
        assert_eq!(
            outcome.messages(),
            vec!["is too long (maximum is 5 characters)", "must contain 5 numbers"]
        );
        assert_eq!(outcome.violations[0].kind, ConstraintKind::Length);
        assert_eq!(outcome.violations[1].kind, ConstraintKind::Pattern);
    }

    #[test]
    fn test_success_has_no_violations() {
        let engine = ValidationEngine::new();
        let outcome = engine.evaluate(Some("12345"), &EvaluationContext::new("zip"), chain().iter());
        assert_eq!(outcome, ValidationOutcome::success());
    }

    #[test]
    fn test_fail_fast_stops_after_first_violation() {
        let engine = ValidationEngine::with_config(ValidationConfig {
            fail_fast: true,
            max_errors: None,
        });
        let outcome = engine.evaluate(Some("abcdefg"), &EvaluationContext::new("zip"), chain().iter());
        assert_eq!(outcome.violations.len(), 1);
        assert!(!outcome.valid);
    }

    #[test]
    fn test_max_errors_caps_collection() {
        let engine = ValidationEngine::with_config(ValidationConfig {
            fail_fast: false,
            max_errors: Some(1),
        });
        let outcome = engine.evaluate(Some("abcdefg"), &EvaluationContext::new("zip"), chain().iter());
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let engine = ValidationEngine::new();
        let evaluators = chain();
        let ctx = EvaluationContext::new("zip");

        let first = engine.evaluate(Some("12a"), &ctx, evaluators.iter());
        let second = engine.evaluate(Some("12a"), &ctx, evaluators.iter());
        assert_eq!(first, second);
    }

    #[test]
    fn test_combine_and_group() {
        let engine = ValidationEngine::new();
        let evaluators = chain();
        let a = engine.evaluate(Some("abcdefg"), &EvaluationContext::new("zip"), evaluators.iter());
        let b = engine.evaluate(Some("12345"), &EvaluationContext::new("zip"), evaluators.iter());

        let combined = b.combine(a);
        assert!(!combined.valid);
        assert_eq!(combined.violations.len(), 2);

        let grouped = combined.by_kind();
        assert_eq!(grouped[&ConstraintKind::Length].len(), 1);
        assert!(combined.has_kind(ConstraintKind::Pattern));
        assert!(!combined.has_kind(ConstraintKind::Numeric));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ValidationConfig::from_lookup(|key| match key {
            "VALIDATION_FAIL_FAST" => Some("true".to_string()),
            "VALIDATION_MAX_ERRORS" => Some("3".to_string()),
            _ => None,
        });
        assert!(config.fail_fast);
        assert_eq!(config.max_errors, Some(3));

        let fallback = ValidationConfig::from_lookup(|key| match key {
            "VALIDATION_FAIL_FAST" => Some("maybe".to_string()),
            "VALIDATION_MAX_ERRORS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(fallback, ValidationConfig::default());
    }

    #[test]
    fn test_config_from_env_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# validation settings").unwrap();
        writeln!(file, "VALIDATION_FAIL_FAST=\"true\"").unwrap();
        writeln!(file, "VALIDATION_MAX_ERRORS=2").unwrap();

        let config = ValidationConfig::from_env_file(file.path()).unwrap();
        assert_eq!(
            config,
            ValidationConfig {
                fail_fast: true,
                max_errors: Some(2),
            }
        );

        let dir = tempfile::tempdir().unwrap();
        let err = ValidationConfig::from_env_file(dir.path().join("absent.env")).unwrap_err();
        assert!(matches!(err, dotenv::Error::Io(_)));
    }
}
