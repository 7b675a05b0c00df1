//! Prelude for declaring and running field validations
//!
//! Re-exports the types most callers need, so a single
//! `use validated_attrs::prelude::*;` is enough to declare and validate records.

pub use crate::error::{ConfigError, ConfigResult};
pub use crate::functional::validation_engine::{ValidationConfig, ValidationEngine, ValidationOutcome};
pub use crate::functional::validation_rules::{ConstraintKind, UniquenessProbe, Violation};
pub use crate::models::field_binding::{Condition, FieldBinding, FieldOptions};
pub use crate::models::format_rule::{FormatRule, LengthConstraint, NumericConstraint};
pub use crate::models::record::Record;
pub use crate::services::composer::Composer;
pub use crate::services::registration::{
    FieldDeclaration, RecordErrors, RecordValidations, ValidatedRecord,
};
pub use crate::services::rule_catalog::RuleCatalog;
