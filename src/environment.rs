//! One-shot environment switch.
//!
//! Environments are named configuration callbacks. At most one distinct
//! environment can ever be activated on a container; activating the same one
//! again is a silent no-op and does not re-run its callback.

use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};

pub(crate) type EnvCallback = Arc<dyn Fn(&Container) -> DiResult<()> + Send + Sync>;

/// Outcome of an activation request.
pub(crate) enum Activation {
    /// First activation: the caller must run the callback.
    Activated(EnvCallback),
    /// The requested environment is already the active one.
    AlreadyActive,
}

#[derive(Default)]
pub(crate) struct EnvironmentManager {
    callbacks: HashMap<String, EnvCallback>,
    /// Configuration order, for listing
    order: Vec<String>,
    active: Option<String>,
}

impl EnvironmentManager {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the callback for `name` without running it.
    pub(crate) fn configure(&mut self, name: &str, callback: EnvCallback) {
        if self.callbacks.insert(name.to_string(), callback).is_none() {
            self.order.push(name.to_string());
        }
    }

    /// Reports whether `activate(name)` would succeed, without committing.
    /// Returns `true` if `name` is already the active environment.
    pub(crate) fn check(&self, name: &str) -> DiResult<bool> {
        if !self.callbacks.contains_key(name) {
            return Err(DiError::UnknownEnvironment(name.to_string()));
        }
        match self.active.as_deref() {
            Some(active) if active == name => Ok(true),
            Some(active) => Err(DiError::EnvironmentConflict {
                active: active.to_string(),
                requested: name.to_string(),
            }),
            None => Ok(false),
        }
    }

    /// Commits to `name`. Nothing is recorded unless the call succeeds.
    pub(crate) fn activate(&mut self, name: &str) -> DiResult<Activation> {
        if self.check(name)? {
            return Ok(Activation::AlreadyActive);
        }
        let callback = self
            .callbacks
            .get(name)
            .cloned()
            .ok_or_else(|| DiError::UnknownEnvironment(name.to_string()))?;
        self.active = Some(name.to_string());
        Ok(Activation::Activated(callback))
    }

    pub(crate) fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.order.clone()
    }
}
