//! Constraint Evaluators
//!
//! Each evaluator checks one constraint kind against a raw field value and
//! produces at most one [`Violation`]. Evaluators are pure: they hold only
//! immutable configuration, so a composed chain can be shared across threads
//! and evaluated concurrently.

use std::fmt;
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_derive::Serialize;

use crate::constants;
use crate::functional::safe_text;
use crate::models::field_binding::Condition;
use crate::models::format_rule::{Bound, LengthConstraint, NumericConstraint, PatternSpec};
use crate::models::record::{is_blank, Record};
use crate::utils::humanize;

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[+-]?[0-9]+\z").unwrap());

// Exponents are capped at four digits.
static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]{1,4})?\z").unwrap()
});

/// The kind of constraint a violation came from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    #[display(fmt = "format")]
    Pattern,
    #[display(fmt = "length")]
    Length,
    #[display(fmt = "numericality")]
    Numeric,
    #[display(fmt = "safe_text")]
    SafeText,
    #[display(fmt = "uniqueness")]
    Uniqueness,
}

/// One failed constraint for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
    pub kind: ConstraintKind,
}

impl Violation {
    pub fn new(field: &str, kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }

    /// Message prefixed with the humanized field name, e.g.
    /// `"Username attr use only letters, numbers, and .-_@ please."`.
    pub fn full_message(&self) -> String {
        format!("{} {}", humanize(&self.field), self.message)
    }
}

/// Answers uniqueness questions on behalf of the persistence layer.
pub trait UniquenessProbe {
    /// True when another stored record already holds `value` in `field`.
    fn is_taken(&self, field: &str, value: &str) -> bool;
}

/// Everything an evaluator may consult besides the value itself.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub field: &'a str,
    pub record: &'a dyn Record,
    pub uniqueness: Option<&'a dyn UniquenessProbe>,
}

impl<'a> EvaluationContext<'a> {
    /// Context for a standalone value, with no surrounding record.
    pub fn new(field: &'a str) -> Self {
        Self {
            field,
            record: &(),
            uniqueness: None,
        }
    }

    pub fn with_record(mut self, record: &'a dyn Record) -> Self {
        self.record = record;
        self
    }

    pub fn with_uniqueness(mut self, probe: &'a dyn UniquenessProbe) -> Self {
        self.uniqueness = Some(probe);
        self
    }
}

impl fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("field", &self.field)
            .field("uniqueness", &self.uniqueness.is_some())
            .finish()
    }
}

/// Core evaluator trait: check one constraint, yield zero or one violation.
pub trait Evaluator: Send + Sync + fmt::Debug {
    fn kind(&self) -> ConstraintKind;

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation>;
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn kind(&self) -> ConstraintKind {
        (**self).kind()
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        (**self).check(value, ctx)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn kind(&self) -> ConstraintKind {
        (**self).kind()
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        (**self).check(value, ctx)
    }
}

/// Whole-value regular expression match.
#[derive(Debug, Clone)]
pub struct PatternEvaluator {
    pattern: PatternSpec,
}

impl PatternEvaluator {
    pub fn new(pattern: PatternSpec) -> Self {
        Self { pattern }
    }
}

impl Evaluator for PatternEvaluator {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Pattern
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        if self.pattern.is_match(value.unwrap_or_default()) {
            return None;
        }
        Some(Violation::new(ctx.field, ConstraintKind::Pattern, self.pattern.message()))
    }
}

/// Character-count validation.
#[derive(Debug, Clone, Copy)]
pub struct LengthEvaluator {
    constraint: LengthConstraint,
}

impl LengthEvaluator {
    pub fn new(constraint: LengthConstraint) -> Self {
        Self { constraint }
    }
}

impl Evaluator for LengthEvaluator {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Length
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        let len = value.unwrap_or_default().chars().count();

        let message = match self.constraint {
            LengthConstraint::Is(n) if len != n => {
                format!("is the wrong length (should be {} characters)", n)
            }
            LengthConstraint::Minimum(min) | LengthConstraint::Within { min, .. } if len < min => {
                format!("is too short (minimum is {} characters)", min)
            }
            LengthConstraint::Maximum(max) | LengthConstraint::Within { max, .. } if len > max => {
                format!("is too long (maximum is {} characters)", max)
            }
            _ => return None,
        };

        Some(Violation::new(ctx.field, ConstraintKind::Length, message))
    }
}

/// Parses the value as a decimal number and checks its bounds.
#[derive(Debug, Clone)]
pub struct NumericEvaluator {
    constraint: NumericConstraint,
}

impl NumericEvaluator {
    pub fn new(constraint: NumericConstraint) -> Self {
        Self { constraint }
    }

    fn violation(&self, field: &str, default_message: String) -> Option<Violation> {
        let message = self.constraint.message.clone().unwrap_or(default_message);
        Some(Violation::new(field, ConstraintKind::Numeric, message))
    }
}

/// Parses plain or scientific decimal notation, ignoring surrounding whitespace.
///
/// Values are arbitrary precision, so magnitudes beyond the range of the
/// bounds' own `Decimal` type still count as numbers.
pub fn parse_number(raw: &str) -> Option<BigDecimal> {
    let raw = raw.trim();
    if !NUMBER_REGEX.is_match(raw) {
        return None;
    }
    BigDecimal::from_str(raw).ok()
}

fn widen(bound: Decimal) -> BigDecimal {
    BigDecimal::new(BigInt::from(bound.mantissa()), i64::from(bound.scale()))
}

impl Evaluator for NumericEvaluator {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Numeric
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        let raw = value.unwrap_or_default().trim();

        let Some(number) = parse_number(raw) else {
            return self.violation(ctx.field, constants::MESSAGE_NOT_A_NUMBER.to_string());
        };

        if self.constraint.only_integer && !INTEGER_REGEX.is_match(raw) {
            return self.violation(ctx.field, constants::MESSAGE_NOT_AN_INTEGER.to_string());
        }

        match self.constraint.lower {
            Some(Bound::Exclusive(lo)) if number <= widen(lo) => {
                return self.violation(ctx.field, format!("must be greater than {}", lo));
            }
            Some(Bound::Inclusive(lo)) if number < widen(lo) => {
                return self.violation(ctx.field, format!("must be greater than or equal to {}", lo));
            }
            _ => {}
        }

        match self.constraint.upper {
            Some(Bound::Exclusive(hi)) if number >= widen(hi) => {
                self.violation(ctx.field, format!("must be less than {}", hi))
            }
            Some(Bound::Inclusive(hi)) if number > widen(hi) => {
                self.violation(ctx.field, format!("must be less than or equal to {}", hi))
            }
            _ => None,
        }
    }
}

/// Rejects control characters other than tab, line feed and carriage return.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlCharEvaluator;

impl Evaluator for ControlCharEvaluator {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SafeText
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        let text = value.filter(|v| !v.trim().is_empty())?;

        safe_text::has_control_chars(text).then(|| {
            Violation::new(ctx.field, ConstraintKind::SafeText, constants::MESSAGE_CONTROL_CHARS)
        })
    }
}

/// Rejects text that an HTML sanitizer would change.
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizationEvaluator;

impl Evaluator for SanitizationEvaluator {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::SafeText
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        let text = value.filter(|v| !v.trim().is_empty())?;

        (!safe_text::is_sanitized(text)).then(|| {
            Violation::new(ctx.field, ConstraintKind::SafeText, constants::MESSAGE_CONTAINS_HTML)
        })
    }
}

/// Uniqueness intent; the actual lookup is delegated to the context's probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniquenessEvaluator;

impl Evaluator for UniquenessEvaluator {
    fn kind(&self) -> ConstraintKind {
        ConstraintKind::Uniqueness
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        let probe = ctx.uniqueness?;
        let value = value?;
        if probe.is_taken(ctx.field, value) {
            Some(Violation::new(ctx.field, ConstraintKind::Uniqueness, constants::MESSAGE_TAKEN))
        } else {
            None
        }
    }
}

/// Runs the wrapped evaluator only when the condition holds.
#[derive(Debug, Clone)]
pub struct ConditionalGate<E> {
    condition: Condition,
    inner: E,
}

impl<E: Evaluator> ConditionalGate<E> {
    pub fn new(condition: Condition, inner: E) -> Self {
        Self { condition, inner }
    }
}

impl<E: Evaluator> Evaluator for ConditionalGate<E> {
    fn kind(&self) -> ConstraintKind {
        self.inner.kind()
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        if self.condition.holds(value, ctx.record) {
            self.inner.check(value, ctx)
        } else {
            None
        }
    }
}

/// Creates an evaluator that only applies `inner` when `condition` holds.
pub fn when<E: Evaluator>(condition: Condition, inner: E) -> ConditionalGate<E> {
    ConditionalGate::new(condition, inner)
}

/// Skips the wrapped evaluator for absent (`allow_nil`) or blank (`allow_blank`) values.
#[derive(Debug, Clone)]
pub struct BlankGate<E> {
    allow_nil: bool,
    allow_blank: bool,
    inner: E,
}

impl<E: Evaluator> BlankGate<E> {
    pub fn new(allow_nil: bool, allow_blank: bool, inner: E) -> Self {
        Self {
            allow_nil,
            allow_blank,
            inner,
        }
    }

    fn exempt(&self, value: Option<&str>) -> bool {
        (self.allow_nil && value.is_none()) || (self.allow_blank && is_blank(value))
    }
}

impl<E: Evaluator> Evaluator for BlankGate<E> {
    fn kind(&self) -> ConstraintKind {
        self.inner.kind()
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        if self.exempt(value) {
            return None;
        }
        self.inner.check(value, ctx)
    }
}

/// Replaces the message of any violation produced by the wrapped evaluator.
#[derive(Debug, Clone)]
pub struct CustomMessage<E> {
    message: String,
    inner: E,
}

impl<E: Evaluator> CustomMessage<E> {
    pub fn new(message: impl Into<String>, inner: E) -> Self {
        Self {
            message: message.into(),
            inner,
        }
    }
}

impl<E: Evaluator> Evaluator for CustomMessage<E> {
    fn kind(&self) -> ConstraintKind {
        self.inner.kind()
    }

    fn check(&self, value: Option<&str>, ctx: &EvaluationContext<'_>) -> Option<Violation> {
        self.inner.check(value, ctx).map(|violation| Violation {
            message: self.message.clone(),
            ..violation
        })
    }
}
