//! Format rules: the named constraint bundles stored in the rule catalog.

use std::fmt;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{ConfigError, ConfigResult};

/// Character-count constraint applied to the stringified value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthConstraint {
    Is(usize),
    Minimum(usize),
    Maximum(usize),
    Within { min: usize, max: usize },
}

impl LengthConstraint {
    pub fn minimum(&self) -> Option<usize> {
        match *self {
            LengthConstraint::Is(n) | LengthConstraint::Minimum(n) => Some(n),
            LengthConstraint::Within { min, .. } => Some(min),
            LengthConstraint::Maximum(_) => None,
        }
    }

    pub fn maximum(&self) -> Option<usize> {
        match *self {
            LengthConstraint::Is(n) | LengthConstraint::Maximum(n) => Some(n),
            LengthConstraint::Within { max, .. } => Some(max),
            LengthConstraint::Minimum(_) => None,
        }
    }

    /// Replaces the lower bound, keeping the upper bound of a range or maximum.
    /// An exact length is replaced outright.
    pub fn with_minimum(self, min: usize) -> Self {
        match self {
            LengthConstraint::Is(_) | LengthConstraint::Minimum(_) => LengthConstraint::Minimum(min),
            LengthConstraint::Maximum(max) | LengthConstraint::Within { max, .. } => {
                LengthConstraint::Within { min, max }
            }
        }
    }

    /// Replaces the upper bound, keeping the lower bound of a range or minimum.
    /// An exact length is replaced outright.
    pub fn with_maximum(self, max: usize) -> Self {
        match self {
            LengthConstraint::Is(_) | LengthConstraint::Maximum(_) => LengthConstraint::Maximum(max),
            LengthConstraint::Minimum(min) | LengthConstraint::Within { min, .. } => {
                LengthConstraint::Within { min, max }
            }
        }
    }

    pub fn is_consistent(&self) -> bool {
        match *self {
            LengthConstraint::Within { min, max } => min <= max,
            _ => true,
        }
    }
}

/// One side of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Inclusive(Decimal),
    Exclusive(Decimal),
}

impl Bound {
    pub fn value(&self) -> Decimal {
        match *self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }
}

/// Numeric constraint: the value must parse as a number and fall within the bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericConstraint {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
    pub only_integer: bool,
    /// Replaces every numeric failure message when set.
    pub message: Option<String>,
}

impl NumericConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn greater_than(mut self, value: impl Into<Decimal>) -> Self {
        self.lower = Some(Bound::Exclusive(value.into()));
        self
    }

    pub fn greater_than_or_equal_to(mut self, value: impl Into<Decimal>) -> Self {
        self.lower = Some(Bound::Inclusive(value.into()));
        self
    }

    pub fn less_than(mut self, value: impl Into<Decimal>) -> Self {
        self.upper = Some(Bound::Exclusive(value.into()));
        self
    }

    pub fn less_than_or_equal_to(mut self, value: impl Into<Decimal>) -> Self {
        self.upper = Some(Bound::Inclusive(value.into()));
        self
    }

    pub fn only_integer(mut self) -> Self {
        self.only_integer = true;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// False when the bounds leave no admissible value.
    pub fn is_consistent(&self) -> bool {
        match (self.lower, self.upper) {
            (Some(Bound::Inclusive(lo)), Some(Bound::Inclusive(hi))) => lo <= hi,
            (Some(lo), Some(hi)) => lo.value() < hi.value(),
            _ => true,
        }
    }
}

/// A compiled, whole-value pattern and the message reported when it does not match.
#[derive(Clone)]
pub struct PatternSpec {
    source: String,
    regex: Regex,
    message: String,
}

impl PatternSpec {
    /// Compiles `source` anchored at both ends, so the whole value must match.
    pub fn new(format: &str, source: &str, message: &str) -> ConfigResult<Self> {
        let regex = Regex::new(&format!(r"\A(?:{})\z", source)).map_err(|e| {
            ConfigError::InvalidPattern {
                format: format.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
            message: message.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for PatternSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSpec")
            .field("source", &self.source)
            .field("message", &self.message)
            .finish()
    }
}

/// A named validation format.
#[derive(Debug, Clone)]
pub struct FormatRule {
    name: String,
    pattern: Option<PatternSpec>,
    length: Option<LengthConstraint>,
    numeric: Option<NumericConstraint>,
    safe_text: bool,
    conditional: bool,
    allow_nil: bool,
    allow_blank: bool,
    uniqueness: bool,
}

impl FormatRule {
    pub fn builder(name: impl Into<String>) -> FormatRuleBuilder {
        FormatRuleBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> Option<&PatternSpec> {
        self.pattern.as_ref()
    }

    pub fn length(&self) -> Option<LengthConstraint> {
        self.length
    }

    pub fn numeric(&self) -> Option<&NumericConstraint> {
        self.numeric.as_ref()
    }

    pub fn is_safe_text(&self) -> bool {
        self.safe_text
    }

    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    pub fn allows_nil(&self) -> bool {
        self.allow_nil
    }

    pub fn allows_blank(&self) -> bool {
        self.allow_blank
    }

    pub fn requires_uniqueness(&self) -> bool {
        self.uniqueness
    }
}

/// Builder for [`FormatRule`]; constraints are checked in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct FormatRuleBuilder {
    name: String,
    pattern: Option<(String, String)>,
    length: Option<LengthConstraint>,
    numeric: Option<NumericConstraint>,
    safe_text: bool,
    conditional: bool,
    allow_nil: bool,
    allow_blank: bool,
    uniqueness: bool,
}

impl FormatRuleBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: None,
            length: None,
            numeric: None,
            safe_text: false,
            conditional: false,
            allow_nil: false,
            allow_blank: false,
            uniqueness: false,
        }
    }

    pub fn pattern(mut self, source: &str, message: &str) -> Self {
        self.pattern = Some((source.to_string(), message.to_string()));
        self
    }

    pub fn length(mut self, length: LengthConstraint) -> Self {
        self.length = Some(length);
        self
    }

    pub fn numeric(mut self, numeric: NumericConstraint) -> Self {
        self.numeric = Some(numeric);
        self
    }

    pub fn safe_text(mut self) -> Self {
        self.safe_text = true;
        self
    }

    /// Only validate when the bound field is present (or the binding's condition holds).
    pub fn conditional(mut self) -> Self {
        self.conditional = true;
        self
    }

    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    pub fn uniqueness(mut self) -> Self {
        self.uniqueness = true;
        self
    }

    pub fn build(self) -> ConfigResult<FormatRule> {
        if self.pattern.is_none() && self.length.is_none() && self.numeric.is_none() && !self.safe_text
        {
            return Err(ConfigError::EmptyRule(self.name));
        }

        let pattern = self
            .pattern
            .map(|(source, message)| PatternSpec::new(&self.name, &source, &message))
            .transpose()?;

        if let Some(length) = self.length.filter(|l| !l.is_consistent()) {
            return Err(ConfigError::InvalidRule {
                format: self.name,
                reason: format!("inverted length range {:?}", length),
            });
        }
        if let Some(numeric) = self.numeric.as_ref().filter(|n| !n.is_consistent()) {
            return Err(ConfigError::InvalidRule {
                reason: format!("empty numeric range {:?}..{:?}", numeric.lower, numeric.upper),
                format: self.name,
            });
        }

        Ok(FormatRule {
            name: self.name,
            pattern,
            length: self.length,
            numeric: self.numeric,
            safe_text: self.safe_text,
            conditional: self.conditional,
            allow_nil: self.allow_nil,
            allow_blank: self.allow_blank,
            uniqueness: self.uniqueness,
        })
    }
}
