//! Rule Catalog
//!
//! Immutable table of named format rules. A catalog is filled once, then shared
//! read-only (behind an `Arc`) by every composer and binding built from it.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use crate::models::format_rule::{FormatRule, LengthConstraint, NumericConstraint};

static BUILTIN: Lazy<Arc<RuleCatalog>> = Lazy::new(|| {
    Arc::new(RuleCatalog::builtin().expect("built-in format rules are well formed"))
});

const EMAIL_LOCAL_PART: &str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~’-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~’-]+)*|"(?:[^"\\\r\n]|\\[\s\S])*")"#;
const DOMAIN_LABELS: &str = r"(?:[a-z0-9-]+\.)+";

#[derive(Debug, Default)]
pub struct RuleCatalog {
    rules: HashMap<String, FormatRule>,
    aliases: HashMap<String, String>,
}

impl RuleCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding every built-in format.
    pub fn builtin() -> ConfigResult<Self> {
        let mut catalog = Self::new();
        for rule in builtin_rules()? {
            catalog.register(rule)?;
        }
        catalog.register_alias("ssn", "social_security_number")?;
        Ok(catalog)
    }

    /// Process-wide built-in catalog, built on first use and never mutated.
    pub fn shared() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN)
    }

    pub fn register(&mut self, rule: FormatRule) -> ConfigResult<()> {
        let name = rule.name().to_string();
        if self.contains(&name) {
            return Err(ConfigError::DuplicateFormat(name));
        }
        log::debug!("registered format `{}`", name);
        self.rules.insert(name, rule);
        Ok(())
    }

    /// Makes `alias` resolve to the rule registered as `target`.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> ConfigResult<()> {
        if self.contains(alias) {
            return Err(ConfigError::DuplicateFormat(alias.to_string()));
        }
        let target = self.lookup(target)?.name().to_string();
        self.aliases.insert(alias.to_string(), target);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> ConfigResult<&FormatRule> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.rules
            .get(canonical)
            .ok_or_else(|| ConfigError::UnknownFormat(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Registered rule names (aliases excluded), sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn builtin_rules() -> ConfigResult<Vec<FormatRule>> {
    let trillion = 1_000_000_000_000i64;

    Ok(vec![
        FormatRule::builder("name")
            .pattern(r"[^\p{Cc}\\<>]*", MESSAGE_CONTROL_CHARS)
            .length(LengthConstraint::Maximum(63))
            .conditional()
            .build()?,
        FormatRule::builder("safe_text").safe_text().conditional().build()?,
        FormatRule::builder("username")
            .length(LengthConstraint::Within { min: 5, max: 127 })
            .pattern(r"[A-Za-z0-9_][A-Za-z0-9_.@-]+", MESSAGE_USERNAME)
            .uniqueness()
            .build()?,
        FormatRule::builder("rails_name")
            .pattern(r"[a-zA-Z_]*", MESSAGE_RAILS_NAME)
            .build()?,
        FormatRule::builder("email")
            .length(LengthConstraint::Maximum(63))
            .pattern(
                &["(?i)", EMAIL_LOCAL_PART, "@", DOMAIN_LABELS, "(?:[a-z]{2,5}|", FIXED_TLDS, ")"].concat(),
                MESSAGE_EMAIL,
            )
            .build()?,
        FormatRule::builder("phone_number")
            .numeric(
                NumericConstraint::new()
                    .only_integer()
                    .greater_than_or_equal_to(1_000_000_000i64)
                    .less_than(10_000_000_000i64)
                    .message(MESSAGE_PHONE_NUMBER),
            )
            .conditional()
            .build()?,
        FormatRule::builder("phone_extension")
            .numeric(
                NumericConstraint::new()
                    .only_integer()
                    .greater_than_or_equal_to(0)
                    .less_than(100_000_000i64)
                    .message(MESSAGE_PHONE_EXTENSION),
            )
            .conditional()
            .build()?,
        FormatRule::builder("domain")
            .length(LengthConstraint::Maximum(63))
            .pattern(
                &["(?i)", DOMAIN_LABELS, "(?:[a-z]{2}|", FIXED_TLDS, ")"].concat(),
                MESSAGE_DOMAIN,
            )
            .build()?,
        FormatRule::builder("zipcode")
            .pattern(r"[0-9]{5}(?:[0-9]{4})?", MESSAGE_ZIPCODE)
            .conditional()
            .build()?,
        FormatRule::builder("middle_initial")
            .pattern(r"[a-zA-Z]?", MESSAGE_MIDDLE_INITIAL)
            .build()?,
        FormatRule::builder("dollar")
            .pattern(r"-?[0-9]{0,12}(?:\.[0-9]{0,2})?", MESSAGE_DOLLAR)
            .numeric(NumericConstraint::new().greater_than(-trillion).less_than(trillion))
            .allow_nil()
            .build()?,
        FormatRule::builder("positive_dollar")
            .pattern(r"[0-9]{0,12}(?:\.[0-9]{0,2})?", MESSAGE_POSITIVE_DOLLAR)
            .numeric(NumericConstraint::new().greater_than_or_equal_to(0).less_than(trillion))
            .allow_nil()
            .build()?,
        FormatRule::builder("percent")
            .pattern(r"-?[0-9]{0,3}(?:\.[0-9]{0,3})?", MESSAGE_PERCENT)
            .numeric(
                NumericConstraint::new()
                    .greater_than_or_equal_to(-100)
                    .less_than_or_equal_to(100),
            )
            .build()?,
        FormatRule::builder("positive_percent")
            .pattern(r"[0-9]{0,3}(?:\.[0-9]{0,3})?", MESSAGE_POSITIVE_PERCENT)
            .numeric(
                NumericConstraint::new()
                    .greater_than_or_equal_to(0)
                    .less_than_or_equal_to(100),
            )
            .allow_nil()
            .build()?,
        FormatRule::builder("url")
            .length(LengthConstraint::Maximum(255))
            .pattern(
                r"(?i)(?:http|https|ftp)://[a-z0-9]+(?:\.[a-z0-9-]{1,63})*\.[a-z]{2,5}(?::[0-9]{1,5})?(?:/.*)?",
                MESSAGE_URL,
            )
            .conditional()
            .build()?,
        FormatRule::builder("social_security_number")
            .length(LengthConstraint::Is(9))
            .numeric(
                NumericConstraint::new()
                    .greater_than_or_equal_to(0)
                    .less_than(1_000_000_000i64)
                    .message(MESSAGE_SSN),
            )
            .conditional()
            .build()?,
        FormatRule::builder("taxid")
            .length(LengthConstraint::Is(9))
            .numeric(
                NumericConstraint::new()
                    .greater_than_or_equal_to(9_999_999i64)
                    .less_than(1_000_000_000i64)
                    .message(MESSAGE_TAXID),
            )
            .conditional()
            .build()?,
        FormatRule::builder("age")
            .numeric(
                NumericConstraint::new()
                    .greater_than_or_equal_to(0)
                    .less_than_or_equal_to(110)
                    .message(MESSAGE_AGE),
            )
            .build()?,
        FormatRule::builder("number")
            .numeric(NumericConstraint::new().message(MESSAGE_NUMBER))
            .build()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format_rule::Bound;
    use rust_decimal::Decimal;

    #[test]
    fn builtin_catalog_has_every_format() {
        let catalog = RuleCatalog::builtin().unwrap();
        assert_eq!(
            catalog.names(),
            vec![
                "age",
                "dollar",
                "domain",
                "email",
                "middle_initial",
                "name",
                "number",
                "percent",
                "phone_extension",
                "phone_number",
                "positive_dollar",
                "positive_percent",
                "rails_name",
                "safe_text",
                "social_security_number",
                "taxid",
                "url",
                "username",
                "zipcode",
            ]
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut catalog = RuleCatalog::builtin().unwrap();
        let rule = FormatRule::builder("zipcode")
            .pattern("[0-9]{5}", "five digits")
            .build()
            .unwrap();

        assert_eq!(
            catalog.register(rule).unwrap_err(),
            ConfigError::DuplicateFormat("zipcode".to_string())
        );
    }

    #[test]
    fn unknown_lookup_is_an_error() {
        let catalog = RuleCatalog::new();
        assert_eq!(
            catalog.lookup("zipcode").unwrap_err(),
            ConfigError::UnknownFormat("zipcode".to_string())
        );
    }

    #[test]
    fn ssn_alias_resolves_to_the_same_rule() {
        let catalog = RuleCatalog::shared();
        let rule = catalog.lookup("ssn").unwrap();
        assert_eq!(rule.name(), "social_security_number");
        assert!(catalog.contains("ssn"));
        assert_eq!(
            RuleCatalog::new().register_alias("ssn", "social_security_number").unwrap_err(),
            ConfigError::UnknownFormat("social_security_number".to_string())
        );
    }

    #[test]
    fn numeric_bounds_are_exact() {
        let catalog = RuleCatalog::shared();

        let dollar = catalog.lookup("dollar").unwrap().numeric().unwrap().clone();
        assert_eq!(dollar.lower, Some(Bound::Exclusive(Decimal::from(-1_000_000_000_000i64))));
        assert_eq!(dollar.upper, Some(Bound::Exclusive(Decimal::from(1_000_000_000_000i64))));

        let taxid = catalog.lookup("taxid").unwrap();
        assert_eq!(taxid.length(), Some(LengthConstraint::Is(9)));
        assert_eq!(
            taxid.numeric().unwrap().lower,
            Some(Bound::Inclusive(Decimal::from(9_999_999)))
        );

        let phone = catalog.lookup("phone_number").unwrap().numeric().unwrap().clone();
        assert!(phone.only_integer);
        assert_eq!(phone.upper, Some(Bound::Exclusive(Decimal::from(10_000_000_000i64))));
    }

    #[test]
    fn flags_follow_the_table() {
        let catalog = RuleCatalog::shared();
        for name in ["name", "safe_text", "phone_number", "phone_extension", "zipcode", "url", "ssn", "taxid"] {
            assert!(catalog.lookup(name).unwrap().is_conditional(), "{} should be conditional", name);
        }
        for name in ["dollar", "positive_dollar", "positive_percent"] {
            assert!(catalog.lookup(name).unwrap().allows_nil(), "{} should allow nil", name);
        }
        assert!(catalog.lookup("username").unwrap().requires_uniqueness());
        assert!(catalog.lookup("safe_text").unwrap().is_safe_text());
    }
}
