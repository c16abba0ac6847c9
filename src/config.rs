//! Configuration loading for containers.
//!
//! A [`ContainerConfig`] carries parameters and an optional environment
//! name. It can be read from JSON or gathered from [`ConfigSource`]s such as
//! process environment variables, then applied to a container.

use std::env;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::container::Container;
use crate::error::DiResult;
use crate::key::SEPARATOR;

/// Parameters and environment selection for a container.
///
/// # Examples
///
/// ```
/// use bowl::{Container, ContainerConfig};
///
/// let config = ContainerConfig::from_json(r#"{
///     "parameters": { "db.host": "localhost", "db.port": 5432 },
///     "environment": "prod"
/// }"#).unwrap();
///
/// let container = Container::new();
/// container.configure("prod", |c| {
///     c.share("db", &[], |c| {
///         let host = c.parameter("db.host")?;
///         Ok(format!("{}:{}", host.as_str().unwrap_or_default(), c.parameter("db.port")?))
///     })?;
///     Ok(())
/// }).unwrap();
///
/// config.apply(&container).unwrap();
/// assert_eq!(container.active_environment().as_deref(), Some("prod"));
/// assert_eq!(*container.get::<String>("db").unwrap(), "localhost:5432");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Parameters, applied in document order
    pub parameters: Map<String, Value>,
    /// Environment to activate after the parameters are set
    pub environment: Option<String>,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document.
    pub fn from_json(document: &str) -> DiResult<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Collects parameters and environment from a source.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        Self {
            parameters: source.parameters(),
            environment: source.environment(),
        }
    }

    /// Layers `other` on top of `self`; its values win.
    pub fn merge(mut self, other: ContainerConfig) -> Self {
        for (key, value) in other.parameters {
            self.parameters.insert(key, value);
        }
        if other.environment.is_some() {
            self.environment = other.environment;
        }
        self
    }

    /// Sets every parameter, then activates the environment if one is named.
    ///
    /// The environment is checked first: an unknown or conflicting
    /// environment fails without writing any parameter.
    pub fn apply(&self, container: &Container) -> DiResult<()> {
        if let Some(environment) = &self.environment {
            container.check_environment(environment)?;
        }
        for (key, value) in &self.parameters {
            container.set_parameter(key.clone(), value.clone());
        }
        if let Some(environment) = &self.environment {
            container.env(environment)?;
        }
        Ok(())
    }
}

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Parameters provided by this source
    fn parameters(&self) -> Map<String, Value>;

    /// Environment requested by this source
    fn environment(&self) -> Option<String> {
        None
    }
}

/// Reads `<PREFIX>_*` process environment variables.
///
/// `APP_DB_HOST=localhost` becomes the parameter `db.host`; `APP_ENV`
/// selects the environment instead of becoming a parameter. Values parse as
/// integers, floats or booleans before falling back to strings.
#[derive(Debug, Clone)]
pub struct EnvironmentConfigSource {
    prefix: String,
}

impl EnvironmentConfigSource {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_uppercase(),
        }
    }

    fn environment_variable(&self) -> String {
        format!("{}_ENV", self.prefix)
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn parameters(&self) -> Map<String, Value> {
        let marker = format!("{}_", self.prefix);
        let selector = self.environment_variable();

        let mut variables: Vec<(String, String)> = env::vars()
            .filter(|(key, _)| key.starts_with(&marker) && *key != selector)
            .collect();
        // Process environment order is unspecified
        variables.sort();

        variables
            .into_iter()
            .map(|(key, value)| {
                let name = key[marker.len()..]
                    .to_lowercase()
                    .replace('_', &SEPARATOR.to_string());
                (name, parse_value(value))
            })
            .collect()
    }

    fn environment(&self) -> Option<String> {
        env::var(self.environment_variable()).ok()
    }
}

/// Integers, then finite floats, then booleans. Anything that would not
/// survive as a JSON number stays a string.
fn parse_value(value: String) -> Value {
    if let Ok(int_val) = value.parse::<i64>() {
        return Value::from(int_val);
    }
    if let Ok(uint_val) = value.parse::<u64>() {
        return Value::from(uint_val);
    }
    if let Some(number) = value
        .parse::<f64>()
        .ok()
        .filter(|float_val| float_val.is_finite())
        .and_then(serde_json::Number::from_f64)
    {
        return Value::Number(number);
    }
    match value.parse::<bool>() {
        Ok(bool_val) => Value::Bool(bool_val),
        Err(_) => Value::String(value),
    }
}
