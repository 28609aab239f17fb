//! # Rule Registry
//!
//! Maps rule names to [`Rule`] handlers. The dispatcher only ever looks
//! rules up by name, so registering a new name makes it usable in any
//! schema without touching the dispatcher.
//!
//! ## Lifecycle
//!
//! A registry is built during startup (`with_builtins()` followed by any
//! `register` calls), then frozen behind an `Arc` and shared read-only by
//! every validation. Registration takes `&mut self`, so concurrent mutation
//! during validation traffic is ruled out by the borrow checker rather than
//! by convention.
//!
//! [`RuleRegistry::builtin`] is the process-wide registry of built-in rules.
//! It is initialised once, on first use.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::rules::{self, MaxRule, MinRule, PatternRule, RequiredRule, Rule};

/// Rule name → rule handler.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// An empty registry. Every rule name is unsupported until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `required`, `max`, `min` and `pattern`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(rules::REQUIRED, RequiredRule);
        registry.register(rules::MAX, MaxRule);
        registry.register(rules::MIN, MinRule);
        registry.register(rules::PATTERN, PatternRule::new());
        registry
    }

    /// The shared registry of built-in rules.
    pub fn builtin() -> Arc<RuleRegistry> {
        static BUILTIN: OnceLock<Arc<RuleRegistry>> = OnceLock::new();
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(RuleRegistry::with_builtins())))
    }

    /// Add or override a named rule, returning the handler it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        rule: impl Rule + 'static,
    ) -> Option<Arc<dyn Rule>> {
        self.register_shared(name, Arc::new(rule))
    }

    /// Add or override a named rule with an already shared handler.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        rule: Arc<dyn Rule>,
    ) -> Option<Arc<dyn Rule>> {
        let name = name.into();
        let replaced = self.rules.insert(name.clone(), rule);
        if replaced.is_some() {
            tracing::debug!(rule = %name, "validation rule overridden");
        }
        replaced
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|rule| rule.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
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

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_core::Value;

    #[test]
    fn builtins_are_registered() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["max", "min", "pattern", "required"]);
        assert!(registry.lookup("required").is_some());
        assert!(registry.lookup("unique").is_none());
    }

    #[test]
    fn empty_registry_supports_nothing() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("required"));
    }

    #[test]
    fn register_adds_new_rule() {
        let mut registry = RuleRegistry::with_builtins();
        let replaced = registry.register("uppercase", |_: &str, value: &Value, _: &Value| {
            value
                .as_str()
                .filter(|s| s.chars().any(char::is_lowercase))
                .map(|_| "must be uppercase".to_string())
        });
        assert!(replaced.is_none());
        assert_eq!(registry.len(), 5);

        let rule = registry.lookup("uppercase").unwrap();
        assert_eq!(
            rule.evaluate("code", &Value::from("abc"), &Value::Bool(true)).as_deref(),
            Some("must be uppercase")
        );
        assert_eq!(rule.evaluate("code", &Value::from("ABC"), &Value::Bool(true)), None);
    }

    #[test]
    fn register_overrides_existing_rule() {
        let mut registry = RuleRegistry::with_builtins();
        let replaced = registry.register("required", |_: &str, _: &Value, _: &Value| {
            Some("always fails".to_string())
        });
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 4);
        let rule = registry.lookup("required").unwrap();
        assert_eq!(
            rule.evaluate("f", &Value::from("present"), &Value::Bool(true)).as_deref(),
            Some("always fails")
        );
    }

    #[test]
    fn builtin_is_shared() {
        let a = RuleRegistry::builtin();
        let b = RuleRegistry::builtin();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleRegistry>();
    }
}
