//! # Query Binder
//!
//! Turns raw query fields into a typed, validated shape.
//!
//! ## Algorithm
//!
//! 1. Check the shape against the registry (every field readable, every rule
//!    registered). A mismatch is a configuration fault, never a field error.
//! 2. Copy the raw values into the shape.
//! 3. For each field in declaration order, run its rules in order. The first
//!    failing rule records `{field, message}` and skips the field's remaining
//!    rules; other fields are still checked.
//! 4. If every field passed, run the shape's own `validate`.
//!
//! The result is all-or-nothing: any failure returns only the errors.

use super::registry::ValidationRegistry;
use super::shape::{QueryShape, RawQueryParams};
use crate::domain::{ConfigurationError, FieldError, QueryError, QueryResult, ValidationError};
use std::sync::Arc;
use tracing::{debug, error};

/// Binds raw fields against a shared, frozen registry.
#[derive(Debug, Clone)]
pub struct QueryBinder {
    registry: Arc<ValidationRegistry>,
}

impl QueryBinder {
    pub fn new(registry: Arc<ValidationRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ValidationRegistry {
        &self.registry
    }

    /// Verify that `T` only references known fields and registered rules.
    ///
    /// Call at startup for every shape served; `bind` repeats the check so a
    /// missed shape still fails on first use instead of validating nothing.
    pub fn check_shape<T: QueryShape>(&self) -> Result<(), ConfigurationError> {
        let probe = T::from_raw(&RawQueryParams::default());

        for spec in T::fields() {
            if probe.field(spec.name).is_none() {
                return Err(ConfigurationError::UnknownField(spec.name.to_string()));
            }
            if let Some(missing) = spec
                .rules
                .iter()
                .find(|r| !self.registry.contains(r.rule))
            {
                return Err(ConfigurationError::UnknownRule {
                    field: spec.name.to_string(),
                    rule: missing.rule.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Bind and validate `raw` into `T`.
    pub fn bind<T: QueryShape>(&self, raw: &RawQueryParams) -> QueryResult<T> {
        if let Err(e) = self.check_shape::<T>() {
            error!(error = %e, "Query shape misconfigured");
            return Err(e.into());
        }

        let target = T::from_raw(raw);
        let mut errors = ValidationError::new();

        for spec in T::fields() {
            let value = target.field(spec.name).unwrap_or_default();

            for rule_ref in spec.rules {
                let rule = self.registry.get(rule_ref.rule).ok_or_else(|| {
                    ConfigurationError::UnknownRule {
                        field: spec.name.to_string(),
                        rule: rule_ref.rule.to_string(),
                    }
                })?;

                if !rule.check(value, &target) {
                    errors.push(FieldError::new(spec.name, rule.name(), rule.message()));
                    break;
                }
            }
        }

        if errors.is_empty() {
            if let Err(e) = target.validate() {
                errors.push(e);
            }
        }

        if let Some(first) = errors.first() {
            debug!(
                field = %first.field,
                rule = %first.rule,
                failures = errors.len(),
                "Query parameters rejected"
            );
            return Err(QueryError::Validation(errors));
        }

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::registry::FieldLookup;
    use crate::validation::shape::{FieldSpec, RuleRef};

    #[derive(Debug, PartialEq)]
    struct Pair {
        low: String,
        high: String,
    }

    impl FieldLookup for Pair {
        fn field(&self, name: &str) -> Option<&str> {
            match name {
                "low" => Some(&self.low),
                "high" => Some(&self.high),
                _ => None,
            }
        }
    }

    const DIGITS: &[RuleRef] = &[RuleRef::new("digits"), RuleRef::new("short")];

    impl QueryShape for Pair {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::new("low", DIGITS), FieldSpec::new("high", DIGITS)]
        }

        fn from_raw(raw: &RawQueryParams) -> Self {
            Self {
                low: raw.get_string("low"),
                high: raw.get_string("high"),
            }
        }

        fn validate(&self) -> Result<(), FieldError> {
            let low: u32 = self.low.parse().unwrap_or(0);
            let high: u32 = self.high.parse().unwrap_or(u32::MAX);
            if low > high {
                return Err(FieldError::new("high", "ordering", "high must not be below low"));
            }
            Ok(())
        }
    }

    struct Broken;

    impl FieldLookup for Broken {
        fn field(&self, _: &str) -> Option<&str> {
            None
        }
    }

    impl QueryShape for Broken {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::new("ghost", &[])]
        }

        fn from_raw(_: &RawQueryParams) -> Self {
            Broken
        }
    }

    fn binder() -> QueryBinder {
        let mut registry = ValidationRegistry::new();
        registry
            .register("digits", "digits only", |v| v.bytes().all(|b| b.is_ascii_digit()))
            .unwrap();
        registry.register("short", "too long", |v| v.len() <= 3).unwrap();
        QueryBinder::new(Arc::new(registry))
    }

    #[test]
    fn test_bind_success() {
        let raw = RawQueryParams::new().with("low", "1").with("high", "20");
        let pair: Pair = binder().bind(&raw).unwrap();
        assert_eq!(pair.low, "1");
        assert_eq!(pair.high, "20");
    }

    #[test]
    fn test_first_failing_rule_per_field() {
        let raw = RawQueryParams::new().with("low", "12x45");
        let err = binder().bind::<Pair>(&raw).unwrap_err();

        let QueryError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().unwrap().rule, "digits");
    }

    #[test]
    fn test_every_field_checked_first_surfaced() {
        let raw = RawQueryParams::new().with("low", "x").with("high", "12345");
        let err = binder().bind::<Pair>(&raw).unwrap_err();

        let QueryError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].field, "low");
        assert_eq!(errors.errors()[1].field, "high");
        assert_eq!(errors.errors()[1].message, "too long");
    }

    #[test]
    fn test_shape_validate_runs_after_fields() {
        let raw = RawQueryParams::new().with("low", "9").with("high", "3");
        let err = binder().bind::<Pair>(&raw).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Validation(ref e) if e.first().unwrap().rule == "ordering"
        ));
    }

    #[test]
    fn test_empty_registry_is_configuration_error() {
        let binder = QueryBinder::new(Arc::new(ValidationRegistry::new()));
        let err = binder.bind::<Pair>(&RawQueryParams::new()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Configuration(ConfigurationError::UnknownRule { .. })
        ));
    }

    #[test]
    fn test_unknown_field_is_configuration_error() {
        assert_eq!(
            binder().check_shape::<Broken>(),
            Err(ConfigurationError::UnknownField("ghost".into()))
        );
    }

    #[test]
    fn test_bind_is_idempotent() {
        let binder = binder();
        let raw = RawQueryParams::new().with("low", "x").with("high", "1");
        let first = binder.bind::<Pair>(&raw).unwrap_err().to_string();
        let second = binder.bind::<Pair>(&raw).unwrap_err().to_string();
        assert_eq!(first, second);
    }
}
