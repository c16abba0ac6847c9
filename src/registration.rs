//! Service definitions and the registry that holds them.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;
use crate::lifetime::Lifetime;

/// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn Fn(&Container) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type Extension = Arc<dyn Fn(AnyArc, &Container) -> DiResult<AnyArc> + Send + Sync>;

/// One registered service: constructor, lifetime, tags, extension chain and
/// (for shared services) the cached instance.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    pub(crate) tags: Vec<String>,
    pub(crate) extensions: Vec<Extension>,
    pub(crate) cached: Option<AnyArc>,
    /// Bumped whenever the definition changes shape or its cache is dropped.
    /// A resolution only stores its result if the generation it started
    /// from is still current.
    pub(crate) generation: u64,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor, tags: Vec<String>) -> Self {
        Self {
            lifetime,
            ctor,
            tags,
            extensions: Vec::new(),
            cached: None,
            generation: 0,
        }
    }
}

/// Everything a resolution needs, copied out so no lock is held while user
/// code runs.
pub(crate) struct ResolutionPlan {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    pub(crate) extensions: Vec<Extension>,
    pub(crate) generation: u64,
}

/// Service registry holding all definitions and the tag index
#[derive(Default)]
pub(crate) struct Registry {
    definitions: HashMap<String, Registration>,
    /// Names in first-registration order
    order: Vec<String>,
    /// Tag -> service names, in registration order
    tags: HashMap<String, Vec<String>>,
    next_generation: u64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Inserts or fully replaces a definition, keeping the tag index in sync.
    pub(crate) fn insert(&mut self, name: &str, mut registration: Registration) {
        registration.generation = self.bump();

        let previous_tags = match self.definitions.get(name) {
            Some(previous) => previous.tags.clone(),
            None => {
                self.order.push(name.to_string());
                Vec::new()
            }
        };

        for tag in previous_tags.iter().filter(|t| !registration.tags.contains(*t)) {
            if let Some(members) = self.tags.get_mut(tag) {
                members.retain(|member| member != name);
            }
        }
        for tag in &registration.tags {
            let members = self.tags.entry(tag.clone()).or_default();
            if !members.iter().any(|member| member == name) {
                members.push(name.to_string());
            }
        }

        self.definitions.insert(name.to_string(), registration);
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Option<&Registration> {
        self.definitions.get(name)
    }

    #[inline]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Appends an extension, invalidating any cached instance built without it.
    pub(crate) fn push_extension(&mut self, name: &str, extension: Extension) -> bool {
        let generation = self.bump();
        match self.definitions.get_mut(name) {
            Some(registration) => {
                registration.extensions.push(extension);
                registration.cached = None;
                registration.generation = generation;
                true
            }
            None => false,
        }
    }

    /// Drops the cached instance. Returns `false` for unknown names.
    pub(crate) fn clear_cache(&mut self, name: &str) -> bool {
        let generation = self.bump();
        match self.definitions.get_mut(name) {
            Some(registration) => {
                registration.cached = None;
                registration.generation = generation;
                true
            }
            None => false,
        }
    }

    /// Stores a freshly built shared instance if the definition is unchanged
    /// since the resolution started and nothing was cached in the meantime.
    ///
    /// Returns the instance the caller should hand out: the cached one when
    /// another build got there first, otherwise `instance` itself.
    pub(crate) fn store(&mut self, name: &str, generation: u64, instance: AnyArc) -> AnyArc {
        match self.definitions.get_mut(name) {
            Some(registration)
                if registration.generation == generation && registration.lifetime.is_cached() =>
            {
                registration.cached.get_or_insert(instance).clone()
            }
            _ => instance,
        }
    }

    pub(crate) fn plan(&self, name: &str) -> Option<ResolutionPlan> {
        self.definitions.get(name).map(|registration| ResolutionPlan {
            lifetime: registration.lifetime,
            ctor: registration.ctor.clone(),
            extensions: registration.extensions.clone(),
            generation: registration.generation,
        })
    }

    /// Snapshot of the names currently holding `tag`.
    pub(crate) fn tagged(&self, tag: &str) -> Vec<String> {
        self.tags.get(tag).cloned().unwrap_or_default()
    }

    /// Definitions in first-registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Registration)> {
        self.order
            .iter()
            .filter_map(|name| self.definitions.get(name).map(|reg| (name.as_str(), reg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(tags: &[&str]) -> Registration {
        let ctor: Ctor = Arc::new(|_| Ok(Arc::new(()) as AnyArc));
        Registration::new(
            Lifetime::Shared,
            ctor,
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn tag_index_follows_registration_order() {
        let mut registry = Registry::new();
        registry.insert("a", registration(&["group"]));
        registry.insert("b", registration(&["group", "other"]));

        assert_eq!(registry.tagged("group"), vec!["a", "b"]);
        assert_eq!(registry.tagged("other"), vec!["b"]);
        assert!(registry.tagged("missing").is_empty());
    }

    #[test]
    fn redefinition_replaces_tags_without_duplicates() {
        let mut registry = Registry::new();
        registry.insert("a", registration(&["group", "old"]));
        registry.insert("b", registration(&["group"]));
        registry.insert("a", registration(&["group"]));

        assert_eq!(registry.tagged("group"), vec!["a", "b"]);
        assert!(registry.tagged("old").is_empty());
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn stale_store_is_discarded() {
        let mut registry = Registry::new();
        registry.insert("a", registration(&[]));
        let plan = registry.plan("a").unwrap();

        assert!(registry.clear_cache("a"));
        let stale: AnyArc = Arc::new(1u8);
        let returned = registry.store("a", plan.generation, stale.clone());
        assert!(Arc::ptr_eq(&returned, &stale));
        assert!(registry.get("a").unwrap().cached.is_none());

        let plan = registry.plan("a").unwrap();
        registry.store("a", plan.generation, Arc::new(2u8));
        assert!(registry.get("a").unwrap().cached.is_some());
    }

    #[test]
    fn first_store_wins() {
        let mut registry = Registry::new();
        registry.insert("a", registration(&[]));
        let plan = registry.plan("a").unwrap();

        let first: AnyArc = Arc::new(1u8);
        let second: AnyArc = Arc::new(2u8);
        let kept = registry.store("a", plan.generation, first.clone());
        let raced = registry.store("a", plan.generation, second);

        assert!(Arc::ptr_eq(&kept, &first));
        assert!(Arc::ptr_eq(&raced, &first));
        let cached = registry.get("a").unwrap().cached.clone().unwrap();
        assert!(Arc::ptr_eq(&cached, &first));
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut registry = Registry::new();
        let ext: Extension = Arc::new(|instance, _| Ok(instance));
        assert!(!registry.push_extension("nope", ext));
        assert!(!registry.clear_cache("nope"));
        assert!(!registry.contains("nope"));
    }
}
