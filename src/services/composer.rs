//! Field Validation Composer
//!
//! Resolves a format name against the catalog, merges the binding's overrides
//! into the rule defaults and produces the ordered evaluator chain for a field.

use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};
use crate::functional::validation_rules::{
    BlankGate, ConditionalGate, ControlCharEvaluator, CustomMessage, Evaluator, LengthEvaluator,
    NumericEvaluator, PatternEvaluator, SanitizationEvaluator, UniquenessEvaluator,
};
use crate::models::field_binding::{Condition, FieldBinding, FieldOptions};
use crate::models::format_rule::{Bound, FormatRule, LengthConstraint, NumericConstraint};
use crate::services::rule_catalog::RuleCatalog;

#[derive(Debug, Clone)]
pub struct Composer {
    catalog: Arc<RuleCatalog>,
}

impl Composer {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// Composer over the shared built-in catalog.
    pub fn builtin() -> Self {
        Self::new(RuleCatalog::shared())
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Builds the binding of `field` to `format`.
    ///
    /// Evaluators run in the order safe text, length, pattern, numeric,
    /// uniqueness. Each is wrapped in a blank gate when nil or blank values are
    /// exempt, and in a conditional gate when the rule is conditional or the
    /// options carry an explicit condition.
    ///
    /// # Errors
    ///
    /// `UnknownFormat` for an unregistered format, `OptionMismatch` for a length
    /// or numeric option on a rule without that constraint, `InvalidOption` for
    /// overrides that leave an empty range.
    pub fn compose(&self, field: &str, format: &str, options: FieldOptions) -> ConfigResult<FieldBinding> {
        let rule = self.catalog.lookup(format)?;

        let length = merge_length(field, rule, &options)?;
        let numeric = merge_numeric(field, rule, &options)?;

        let allow_nil = options.allow_nil.unwrap_or(rule.allows_nil());
        let allow_blank = options.allow_blank.unwrap_or(rule.allows_blank());
        let uniqueness = options.uniqueness.unwrap_or(rule.requires_uniqueness());
        let condition = options
            .condition
            .clone()
            .or_else(|| rule.is_conditional().then_some(Condition::Present));

        let mut base: Vec<Box<dyn Evaluator>> = Vec::new();
        if rule.is_safe_text() {
            base.push(Box::new(ControlCharEvaluator));
            base.push(Box::new(SanitizationEvaluator));
        }
        if let Some(length) = length {
            base.push(Box::new(LengthEvaluator::new(length)));
        }
        if let Some(pattern) = rule.pattern() {
            base.push(Box::new(PatternEvaluator::new(pattern.clone())));
        }
        if let Some(numeric) = numeric {
            base.push(Box::new(NumericEvaluator::new(numeric)));
        }
        if uniqueness {
            base.push(Box::new(UniquenessEvaluator));
        }

        let evaluators = base
            .into_iter()
            .map(|evaluator| {
                let mut evaluator = evaluator;
                if let Some(message) = &options.message {
                    evaluator = Box::new(CustomMessage::new(message.clone(), evaluator));
                }
                if allow_nil || allow_blank {
                    evaluator = Box::new(BlankGate::new(allow_nil, allow_blank, evaluator));
                }
                if let Some(condition) = &condition {
                    evaluator = Box::new(ConditionalGate::new(condition.clone(), evaluator));
                }
                evaluator
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            field,
            format = rule.name(),
            evaluators = evaluators.len(),
            conditional = condition.is_some(),
            "composed field binding"
        );

        Ok(FieldBinding::new(
            field.to_string(),
            rule.name().to_string(),
            evaluators,
            condition,
            (allow_nil, allow_blank, uniqueness),
        ))
    }
}

fn merge_length(
    field: &str,
    rule: &FormatRule,
    options: &FieldOptions,
) -> ConfigResult<Option<LengthConstraint>> {
    let Some(mut length) = rule.length() else {
        return match options.has_length_option() {
            Some(option) => Err(mismatch(field, rule, option, "length")),
            None => Ok(None),
        };
    };

    if let Some(len) = options.is_length {
        length = LengthConstraint::Is(len);
    }
    if let Some((min, max)) = options.within_length {
        length = LengthConstraint::Within { min, max };
    }
    if let Some(min) = options.minimum_length {
        length = length.with_minimum(min);
    }
    if let Some(max) = options.maximum_length {
        length = length.with_maximum(max);
    }

    if !length.is_consistent() {
        return Err(ConfigError::InvalidOption {
            field: field.to_string(),
            option: options.has_length_option().unwrap_or("length"),
            reason: format!("minimum exceeds maximum in {:?}", length),
        });
    }
    Ok(Some(length))
}

fn merge_numeric(
    field: &str,
    rule: &FormatRule,
    options: &FieldOptions,
) -> ConfigResult<Option<NumericConstraint>> {
    let Some(numeric) = rule.numeric() else {
        return match options.has_numeric_option() {
            Some(option) => Err(mismatch(field, rule, option, "numeric")),
            None => Ok(None),
        };
    };
    let mut numeric = numeric.clone();

    numeric.lower = match (options.greater_than, options.greater_than_or_equal_to) {
        (Some(_), Some(_)) => return Err(conflicting(field, "greater_than")),
        (Some(v), None) => Some(Bound::Exclusive(v)),
        (None, Some(v)) => Some(Bound::Inclusive(v)),
        (None, None) => numeric.lower,
    };
    numeric.upper = match (options.less_than, options.less_than_or_equal_to) {
        (Some(_), Some(_)) => return Err(conflicting(field, "less_than")),
        (Some(v), None) => Some(Bound::Exclusive(v)),
        (None, Some(v)) => Some(Bound::Inclusive(v)),
        (None, None) => numeric.upper,
    };

    if !numeric.is_consistent() {
        return Err(ConfigError::InvalidOption {
            field: field.to_string(),
            option: options.has_numeric_option().unwrap_or("numeric"),
            reason: "bounds leave no admissible value".to_string(),
        });
    }
    Ok(Some(numeric))
}

fn mismatch(field: &str, rule: &FormatRule, option: &'static str, constraint: &'static str) -> ConfigError {
    ConfigError::OptionMismatch {
        field: field.to_string(),
        format: rule.name().to_string(),
        option,
        constraint,
    }
}

fn conflicting(field: &str, option: &'static str) -> ConfigError {
    ConfigError::InvalidOption {
        field: field.to_string(),
        option,
        reason: "exclusive and inclusive bounds given for the same side".to_string(),
    }
}
