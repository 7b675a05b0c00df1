pub mod composer;
pub mod registration;
pub mod rule_catalog;
