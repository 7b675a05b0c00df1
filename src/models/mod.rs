pub mod field_binding;
pub mod format_rule;
pub mod record;
