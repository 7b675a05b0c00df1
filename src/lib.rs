//! Declarative field validation.
//!
//! Fields of a persisted record are bound to named formats from a
//! [`RuleCatalog`](services::rule_catalog::RuleCatalog). The
//! [`Composer`](services::composer::Composer) turns each binding into an ordered
//! evaluator chain, and validating a record yields every violation per field.

pub mod constants;
pub mod error;
pub mod functional;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{ConfigError, ConfigResult};
pub use functional::prelude;
