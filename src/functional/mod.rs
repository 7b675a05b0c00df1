pub mod prelude;
pub mod safe_text;
pub mod validation_engine;
pub mod validation_rules;
