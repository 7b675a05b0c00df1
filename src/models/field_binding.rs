use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::functional::validation_engine::{ValidationEngine, ValidationOutcome};
use crate::functional::validation_rules::{EvaluationContext, Evaluator, UniquenessProbe};
use crate::models::record::{is_blank, Record};

/// Decides whether a conditional binding applies to the current record.
#[derive(Clone)]
pub enum Condition {
    /// The bound field itself holds a non-blank value.
    Present,
    /// Another field of the record holds a non-blank value.
    FieldPresent(String),
    /// Fixed answer, typically read from configuration.
    Flag(bool),
    /// Arbitrary predicate over the record.
    Predicate(Arc<dyn Fn(&dyn Record) -> bool + Send + Sync>),
}

impl Condition {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&dyn Record) -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(f))
    }

    pub fn holds(&self, value: Option<&str>, record: &dyn Record) -> bool {
        match self {
            Condition::Present => !is_blank(value),
            Condition::FieldPresent(field) => record.is_present(field),
            Condition::Flag(flag) => *flag,
            Condition::Predicate(f) => f(record),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Present => f.write_str("Present"),
            Condition::FieldPresent(field) => f.debug_tuple("FieldPresent").field(field).finish(),
            Condition::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Per-binding overrides merged into the catalog rule by the composer.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub(crate) minimum_length: Option<usize>,
    pub(crate) maximum_length: Option<usize>,
    pub(crate) within_length: Option<(usize, usize)>,
    pub(crate) is_length: Option<usize>,
    pub(crate) greater_than: Option<Decimal>,
    pub(crate) greater_than_or_equal_to: Option<Decimal>,
    pub(crate) less_than: Option<Decimal>,
    pub(crate) less_than_or_equal_to: Option<Decimal>,
    pub(crate) message: Option<String>,
    pub(crate) allow_nil: Option<bool>,
    pub(crate) allow_blank: Option<bool>,
    pub(crate) uniqueness: Option<bool>,
    pub(crate) condition: Option<Condition>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum_length(mut self, min: usize) -> Self {
        self.minimum_length = Some(min);
        self
    }

    pub fn maximum_length(mut self, max: usize) -> Self {
        self.maximum_length = Some(max);
        self
    }

    pub fn within_length(mut self, min: usize, max: usize) -> Self {
        self.within_length = Some((min, max));
        self
    }

    pub fn is_length(mut self, len: usize) -> Self {
        self.is_length = Some(len);
        self
    }

    pub fn greater_than(mut self, value: impl Into<Decimal>) -> Self {
        self.greater_than = Some(value.into());
        self
    }

    pub fn greater_than_or_equal_to(mut self, value: impl Into<Decimal>) -> Self {
        self.greater_than_or_equal_to = Some(value.into());
        self
    }

    pub fn less_than(mut self, value: impl Into<Decimal>) -> Self {
        self.less_than = Some(value.into());
        self
    }

    pub fn less_than_or_equal_to(mut self, value: impl Into<Decimal>) -> Self {
        self.less_than_or_equal_to = Some(value.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn allow_nil(mut self, allow: bool) -> Self {
        self.allow_nil = Some(allow);
        self
    }

    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = Some(allow);
        self
    }

    pub fn uniqueness(mut self, unique: bool) -> Self {
        self.uniqueness = Some(unique);
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub(crate) fn has_length_option(&self) -> Option<&'static str> {
        [
            ("minimum_length", self.minimum_length.is_some()),
            ("maximum_length", self.maximum_length.is_some()),
            ("within_length", self.within_length.is_some()),
            ("is_length", self.is_length.is_some()),
        ]
        .into_iter()
        .find_map(|(name, set)| set.then_some(name))
    }

    pub(crate) fn has_numeric_option(&self) -> Option<&'static str> {
        [
            ("greater_than", self.greater_than.is_some()),
            ("greater_than_or_equal_to", self.greater_than_or_equal_to.is_some()),
            ("less_than", self.less_than.is_some()),
            ("less_than_or_equal_to", self.less_than_or_equal_to.is_some()),
        ]
        .into_iter()
        .find_map(|(name, set)| set.then_some(name))
    }
}

/// A record field bound to one format, with its composed evaluator chain.
///
/// Bindings are built by the [`Composer`](crate::services::composer::Composer)
/// and never change afterwards.
#[derive(Debug)]
pub struct FieldBinding {
    field: String,
    format: String,
    evaluators: Vec<Box<dyn Evaluator>>,
    condition: Option<Condition>,
    allow_nil: bool,
    allow_blank: bool,
    uniqueness: bool,
}

impl FieldBinding {
    pub(crate) fn new(
        field: String,
        format: String,
        evaluators: Vec<Box<dyn Evaluator>>,
        condition: Option<Condition>,
        (allow_nil, allow_blank, uniqueness): (bool, bool, bool),
    ) -> Self {
        Self {
            field,
            format,
            evaluators,
            condition,
            allow_nil,
            allow_blank,
            uniqueness,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn evaluators(&self) -> &[Box<dyn Evaluator>] {
        &self.evaluators
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
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

    /// Evaluates a standalone value with the default engine.
    pub fn evaluate(&self, value: Option<&str>) -> ValidationOutcome {
        self.evaluate_with(&ValidationEngine::new(), value, &EvaluationContext::new(&self.field))
    }

    /// Evaluates the bound field of `record`.
    pub fn evaluate_in(
        &self,
        record: &dyn Record,
        probe: Option<&dyn UniquenessProbe>,
    ) -> ValidationOutcome {
        let value = record.value_of(&self.field);
        let mut ctx = EvaluationContext::new(&self.field).with_record(record);
        ctx.uniqueness = probe;
        self.evaluate_with(&ValidationEngine::new(), value.as_deref(), &ctx)
    }

    pub fn evaluate_with(
        &self,
        engine: &ValidationEngine,
        value: Option<&str>,
        ctx: &EvaluationContext<'_>,
    ) -> ValidationOutcome {
        engine.evaluate(value, ctx, self.evaluators.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn predicate_condition_reads_the_record() {
        let condition = Condition::predicate(|record| record.value_of("country").as_deref() == Some("US"));

        let mut record = HashMap::new();
        record.insert("country".to_string(), "US".to_string());
        assert!(condition.holds(None, &record));

        record.insert("country".to_string(), "CA".to_string());
        assert!(!condition.holds(Some("12345"), &record));
    }

    #[test]
    fn option_detection_names_the_first_option() {
        let options = FieldOptions::new().maximum_length(10).is_length(3);
        assert_eq!(options.has_length_option(), Some("maximum_length"));
        assert_eq!(options.has_numeric_option(), None);

        let numeric = FieldOptions::new().less_than(5);
        assert_eq!(numeric.has_numeric_option(), Some("less_than"));
    }

    #[test]
    fn condition_debug_hides_closures() {
        let condition = Condition::predicate(|_| true);
        assert_eq!(format!("{:?}", condition), "Predicate(..)");
    }
}
