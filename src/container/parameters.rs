//! Plain parameter storage and the unified key lookup.

use std::sync::Arc;

use serde_json::Value;

use super::Container;
use crate::error::{DiError, DiResult};
use crate::key::is_valid_name;
use crate::registration::AnyArc;

/// Result of [`Container::entry`]: a resolved service or a parameter value.
#[derive(Debug, Clone)]
pub enum Entry {
    Service(AnyArc),
    Parameter(Value),
}

impl Entry {
    pub fn as_parameter(&self) -> Option<&Value> {
        match self {
            Entry::Parameter(value) => Some(value),
            Entry::Service(_) => None,
        }
    }

    /// Downcasts a service entry. Parameters and mismatched types give `None`.
    pub fn into_service<T: Send + Sync + 'static>(self) -> Option<Arc<T>> {
        match self {
            Entry::Service(instance) => instance.downcast::<T>().ok(),
            Entry::Parameter(_) => None,
        }
    }
}

impl Container {
    /// Stores a parameter, replacing any previous value under `key`.
    ///
    /// Keys may contain the separator; dotted keys never clash with services.
    pub fn set_parameter(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.parameters.write().insert(key.into(), value.into());
        self
    }

    /// Reads a parameter.
    pub fn parameter(&self, key: &str) -> DiResult<Value> {
        self.parameters
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| DiError::UnknownKey(key.to_string()))
    }

    /// Removes a parameter, returning its value. Later parameters keep their
    /// relative order.
    pub fn unset_parameter(&self, key: &str) -> Option<Value> {
        self.parameters.write().shift_remove(key)
    }

    /// Whether `key` names a service or a parameter.
    pub fn has(&self, key: &str) -> bool {
        self.contains_service(key) || self.parameters.read().contains_key(key)
    }

    /// Looks `key` up as a service first, then as a parameter.
    ///
    /// ```
    /// use bowl::{Container, Entry};
    ///
    /// let container = Container::new();
    /// container.set_parameter("name", "bowl");
    /// container.share("name", &[], |_| Ok(42u8)).unwrap();
    /// container.set_parameter("app.name", "bowl");
    ///
    /// assert_eq!(*container.entry("name").unwrap().into_service::<u8>().unwrap(), 42);
    /// assert_eq!(container.entry("app.name").unwrap().as_parameter().unwrap(), "bowl");
    /// ```
    pub fn entry(&self, key: &str) -> DiResult<Entry> {
        if is_valid_name(key) && self.contains_service(key) {
            return self.get_any(key).map(Entry::Service);
        }
        self.parameter(key).map(Entry::Parameter)
    }

    /// Every parameter in insertion order.
    pub fn parameters(&self) -> Vec<(String, Value)> {
        self.parameters
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
