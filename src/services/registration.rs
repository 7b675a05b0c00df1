//! Record-level registration and validation
//!
//! Turns a set of field declarations into composed bindings and validates whole
//! records against them. Declarations come either as typed [`FieldDeclaration`]s
//! or as a JSON mapping of field name to `{"format": ..., options}`.

use rust_decimal::Decimal;
use serde_derive::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::functional::validation_engine::{ValidationEngine, ValidationOutcome};
use crate::functional::validation_rules::{EvaluationContext, UniquenessProbe, Violation};
use crate::models::field_binding::{Condition, FieldBinding, FieldOptions};
use crate::models::record::Record;
use crate::services::composer::Composer;

/// One field bound to one format.
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    pub field: String,
    pub format: String,
    pub options: FieldOptions,
}

impl FieldDeclaration {
    pub fn new(field: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            format: format.into(),
            options: FieldOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }
}

/// Wire form of a single JSON declaration entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclarationEntry {
    format: String,
    minimum_length: Option<usize>,
    maximum_length: Option<usize>,
    within_length: Option<[usize; 2]>,
    is_length: Option<usize>,
    greater_than: Option<Decimal>,
    greater_than_or_equal_to: Option<Decimal>,
    less_than: Option<Decimal>,
    less_than_or_equal_to: Option<Decimal>,
    message: Option<String>,
    allow_nil: Option<bool>,
    allow_blank: Option<bool>,
    uniqueness: Option<bool>,
    #[serde(rename = "if")]
    if_flag: Option<bool>,
    if_present: Option<String>,
}

impl DeclarationEntry {
    fn into_declaration(self, field: &str) -> ConfigResult<FieldDeclaration> {
        let condition = match (self.if_flag, self.if_present) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::malformed(field, "`if` and `if_present` are mutually exclusive"))
            }
            (Some(flag), None) => Some(Condition::Flag(flag)),
            (None, Some(other)) => Some(Condition::FieldPresent(other)),
            (None, None) => None,
        };

        let options = FieldOptions {
            minimum_length: self.minimum_length,
            maximum_length: self.maximum_length,
            within_length: self.within_length.map(|[min, max]| (min, max)),
            is_length: self.is_length,
            greater_than: self.greater_than,
            greater_than_or_equal_to: self.greater_than_or_equal_to,
            less_than: self.less_than,
            less_than_or_equal_to: self.less_than_or_equal_to,
            message: self.message,
            allow_nil: self.allow_nil,
            allow_blank: self.allow_blank,
            uniqueness: self.uniqueness,
            condition,
        };

        Ok(FieldDeclaration::new(field, self.format).with_options(options))
    }
}

/// The composed validations of one record type.
#[derive(Debug)]
pub struct RecordValidations {
    bindings: Vec<FieldBinding>,
    engine: ValidationEngine,
}

impl RecordValidations {
    /// Composes every declaration, in order.
    ///
    /// # Errors
    ///
    /// `EmptyDeclaration` when nothing is declared, otherwise the first error
    /// raised by the composer.
    pub fn declare<I>(composer: &Composer, declarations: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = FieldDeclaration>,
    {
        let bindings = declarations
            .into_iter()
            .map(|decl| composer.compose(&decl.field, &decl.format, decl.options))
            .collect::<ConfigResult<Vec<_>>>()?;

        if bindings.is_empty() {
            return Err(ConfigError::EmptyDeclaration);
        }

        log::debug!("declared validations for {} field(s)", bindings.len());
        Ok(Self {
            bindings,
            engine: ValidationEngine::new(),
        })
    }

    /// Declares validations from `{"field": {"format": "...", ...options}}`.
    ///
    /// Fields are declared in the insertion order of the JSON object.
    pub fn from_json(composer: &Composer, value: &Value) -> ConfigResult<Self> {
        let entries = value.as_object().ok_or_else(|| {
            ConfigError::malformed("<declarations>", "expected an object mapping field names to options")
        })?;
        if entries.is_empty() {
            return Err(ConfigError::EmptyDeclaration);
        }

        let declarations = entries
            .iter()
            .map(|(field, entry)| parse_entry(field, entry))
            .collect::<ConfigResult<Vec<_>>>()?;

        Self::declare(composer, declarations)
    }

    /// Replaces the default collect-everything engine.
    pub fn with_engine(mut self, engine: ValidationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn binding(&self, field: &str) -> Option<&FieldBinding> {
        self.bindings.iter().find(|b| b.field() == field)
    }

    pub fn validate(&self, record: &dyn Record) -> RecordErrors {
        self.validate_with(record, None)
    }

    /// Validates every bound field of `record`. Fields bound more than once
    /// get a single merged outcome.
    pub fn validate_with(
        &self,
        record: &dyn Record,
        probe: Option<&dyn UniquenessProbe>,
    ) -> RecordErrors {
        let mut outcomes: Vec<(String, ValidationOutcome)> = Vec::with_capacity(self.bindings.len());

        for binding in &self.bindings {
            let value = record.value_of(binding.field());
            let mut ctx = EvaluationContext::new(binding.field()).with_record(record);
            ctx.uniqueness = probe;
            let outcome = binding.evaluate_with(&self.engine, value.as_deref(), &ctx);

            match outcomes.iter_mut().find(|(field, _)| field == binding.field()) {
                Some((_, existing)) => {
                    let previous = std::mem::replace(existing, ValidationOutcome::success());
                    *existing = previous.combine(outcome);
                }
                None => outcomes.push((binding.field().to_string(), outcome)),
            }
        }

        let errors = RecordErrors { outcomes };
        if !errors.is_valid() {
            log::debug!("record failed validation: {:?}", errors.full_messages());
        }
        errors
    }

    /// Validates many records in parallel, keeping input order.
    #[cfg(feature = "parallel")]
    pub fn validate_batch<R>(&self, records: &[R]) -> Vec<RecordErrors>
    where
        R: Record + Sync,
    {
        use rayon::prelude::*;

        log::debug!(
            "validating {} records on {} threads",
            records.len(),
            rayon::current_num_threads()
        );
        records.par_iter().map(|record| self.validate(record)).collect()
    }
}

fn parse_entry(field: &str, entry: &Value) -> ConfigResult<FieldDeclaration> {
    if !entry.is_object() {
        return Err(ConfigError::malformed(field, "expected an object with a `format` key"));
    }
    let entry: DeclarationEntry =
        serde_json::from_value(entry.clone()).map_err(|e| ConfigError::malformed(field, e.to_string()))?;
    entry.into_declaration(field)
}

/// Per-field outcomes of validating one record, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordErrors {
    outcomes: Vec<(String, ValidationOutcome)>,
}

impl RecordErrors {
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_valid())
    }

    pub fn outcome(&self, field: &str) -> Option<&ValidationOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, outcome)| outcome)
    }

    /// Bare messages for `field`; empty when the field is valid or not bound.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.outcome(field).map(ValidationOutcome::messages).unwrap_or_default()
    }

    /// `"<Humanized field> <message>"` for every violation.
    pub fn full_messages(&self) -> Vec<String> {
        self.violations().map(Violation::full_message).collect()
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.outcomes.iter().flat_map(|(_, outcome)| outcome.violations.iter())
    }

    pub fn error_count(&self) -> usize {
        self.violations().count()
    }

    /// `{"field": ["message", ...]}` for every invalid field.
    pub fn to_json(&self) -> Value {
        let errors = self
            .outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_valid())
            .map(|(field, outcome)| {
                let messages = outcome.messages().into_iter().map(Value::from).collect();
                (field.clone(), Value::Array(messages))
            })
            .collect::<Map<String, Value>>();
        Value::Object(errors)
    }
}

/// A persistence model that carries its own declared validations.
pub trait ValidatedRecord: Record {
    fn validations(&self) -> &RecordValidations;

    /// Persistence-backed uniqueness lookups; none by default.
    fn uniqueness_probe(&self) -> Option<&dyn UniquenessProbe> {
        None
    }

    fn validate(&self) -> RecordErrors
    where
        Self: Sized,
    {
        self.validations().validate_with(self, self.uniqueness_probe())
    }

    fn is_valid(&self) -> bool
    where
        Self: Sized,
    {
        self.validate().is_valid()
    }
}
