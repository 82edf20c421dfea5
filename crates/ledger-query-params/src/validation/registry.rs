//! # Validation Registry
//!
//! Named rules looked up by the per-field rule tables of each query shape.
//!
//! The registry is built once at startup, then frozen behind an `Arc` and
//! shared by every request. Registration needs `&mut self`, so a shared
//! registry cannot be mutated after it has been handed out.

use super::rules;
use crate::domain::{ConfigurationError, QueryConfig};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Read access to the sibling fields of the struct being validated.
pub trait FieldLookup {
    /// Raw value of `name`, `None` if the shape has no such field.
    fn field(&self, name: &str) -> Option<&str>;
}

/// Predicate over a single field value.
pub type FieldPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate over a field value and the struct that owns it.
pub type ContextPredicate = Arc<dyn Fn(&str, &dyn FieldLookup) -> bool + Send + Sync>;

#[derive(Clone)]
enum Predicate {
    Field(FieldPredicate),
    Contextual(ContextPredicate),
}

/// A named rule and its default message.
#[derive(Clone)]
pub struct ValidationRule {
    name: String,
    message: String,
    predicate: Predicate,
}

impl ValidationRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_contextual(&self) -> bool {
        matches!(self.predicate, Predicate::Contextual(_))
    }

    /// Evaluate the rule.
    ///
    /// Plain rules accept an empty value: an omitted optional field is absent,
    /// not invalid. Contextual rules always run so they can demand a value
    /// when a sibling field is set.
    pub fn check(&self, value: &str, owner: &dyn FieldLookup) -> bool {
        match &self.predicate {
            Predicate::Field(predicate) => value.is_empty() || predicate(value),
            Predicate::Contextual(predicate) => predicate(value, owner),
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("contextual", &self.is_contextual())
            .finish()
    }
}

/// Process-wide rule table.
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    rules: HashMap<String, ValidationRule>,
}

impl ValidationRegistry {
    /// Empty registry. Shapes bound against it fail with `UnknownRule`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every rule the offer endpoints use.
    pub fn standard(config: &QueryConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let mut registry = Self::new();
        rules::register_standard(&mut registry, config)?;
        debug!(rules = registry.len(), "Validation registry initialised");
        Ok(registry)
    }

    /// Register a plain rule.
    pub fn register<F>(
        &mut self,
        name: &str,
        message: impl Into<String>,
        predicate: F,
    ) -> Result<(), ConfigurationError>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.insert(name, message.into(), Predicate::Field(Arc::new(predicate)))
    }

    /// Register a rule that also sees the owning struct.
    pub fn register_contextual<F>(
        &mut self,
        name: &str,
        message: impl Into<String>,
        predicate: F,
    ) -> Result<(), ConfigurationError>
    where
        F: Fn(&str, &dyn FieldLookup) -> bool + Send + Sync + 'static,
    {
        self.insert(
            name,
            message.into(),
            Predicate::Contextual(Arc::new(predicate)),
        )
    }

    fn insert(
        &mut self,
        name: &str,
        message: String,
        predicate: Predicate,
    ) -> Result<(), ConfigurationError> {
        if self.rules.contains_key(name) {
            return Err(ConfigurationError::DuplicateRule(name.to_string()));
        }
        self.rules.insert(
            name.to_string(),
            ValidationRule {
                name: name.to_string(),
                message,
                predicate,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ValidationRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owner(&'static str);

    impl FieldLookup for Owner {
        fn field(&self, name: &str) -> Option<&str> {
            (name == "flag").then_some(self.0)
        }
    }

    #[test]
    fn test_plain_rule_skips_empty() {
        let mut registry = ValidationRegistry::new();
        registry.register("digits", "digits only", |v| v.bytes().all(|b| b.is_ascii_digit())).unwrap();

        let rule = registry.get("digits").unwrap();
        assert!(!rule.is_contextual());
        assert!(rule.check("", &Owner("")));
        assert!(rule.check("123", &Owner("")));
        assert!(!rule.check("12a", &Owner("")));
    }

    #[test]
    fn test_contextual_rule_sees_owner() {
        let mut registry = ValidationRegistry::new();
        registry
            .register_contextual("needsFlag", "flag must be set", |_, owner| {
                owner.field("flag").is_some_and(|f| !f.is_empty())
            })
            .unwrap();

        let rule = registry.get("needsFlag").unwrap();
        assert!(rule.is_contextual());
        assert!(rule.check("", &Owner("on")));
        assert!(!rule.check("", &Owner("")));
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let mut registry = ValidationRegistry::new();
        registry.register("a", "a", |_| true).unwrap();
        assert_eq!(
            registry.register("a", "a", |_| false),
            Err(ConfigurationError::DuplicateRule("a".into()))
        );
    }

    #[test]
    fn test_standard_registry() {
        let registry = ValidationRegistry::standard(&QueryConfig::default()).unwrap();
        for name in [
            rules::ACCOUNT_ID,
            rules::ASSET_TYPE,
            rules::CURSOR,
            rules::ORDER,
            rules::LIMIT,
            rules::SELLING_CODE,
            rules::BUYING_CODE,
            rules::SELLING_ISSUER,
            rules::BUYING_ISSUER,
        ] {
            assert!(registry.contains(name), "missing rule {}", name);
        }
        assert!(registry.get(rules::SELLING_CODE).unwrap().is_contextual());
    }
}
