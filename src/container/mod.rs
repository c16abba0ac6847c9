//! The container: service registration, resolution and environments.
//!
//! All operations take `&self`. Internal state sits behind `parking_lot`
//! locks that are released before any factory, extension, environment
//! callback or observer runs, which is what lets a factory resolve other
//! services from inside its own body.

use std::any::type_name;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::descriptors::ServiceDescriptor;
use crate::environment::{Activation, EnvironmentManager};
use crate::error::{DiError, DiResult};
use crate::key::{validate, KeyKind};
use crate::lifetime::Lifetime;
use crate::observer::{ContainerObserver, Observers};
use crate::registration::{AnyArc, Ctor, Extension, Registration, Registry};
use crate::tagged::TaggedServices;

mod parameters;

pub use parameters::Entry;

/// Name-keyed service container.
///
/// Services are registered with a factory closure that receives the
/// container, so it can resolve its own dependencies or read parameters.
///
/// # Thread Safety
///
/// The container is `Send + Sync` and its own bookkeeping is consistent
/// under concurrent use, but resolution is not serialized: two threads
/// racing on a cold shared service may both run its factory. The first
/// result to finish is cached and every racer receives that same instance.
/// Callers that need strict once-only construction across threads must
/// serialize access themselves.
///
/// Resolution has no cycle detection. A factory that resolves its own name,
/// directly or transitively, recurses until the stack is exhausted.
///
/// # Examples
///
/// ```
/// use bowl::Container;
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::new();
/// container.set_parameter("db.url", "postgres://localhost");
/// container.share("db", &[], |c| {
///     let url = c.parameter("db.url")?;
///     Ok(Database { url: url.as_str().unwrap_or_default().to_string() })
/// }).unwrap();
/// container.factory("users", &[], |c| Ok(UserService { db: c.get("db")? })).unwrap();
///
/// let users = container.get::<UserService>("users").unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct Container {
    registry: RwLock<Registry>,
    parameters: RwLock<Map<String, Value>>,
    environments: Mutex<EnvironmentManager>,
    observers: RwLock<Observers>,
}

/// What a lookup found, copied out of the registry.
enum Lookup {
    Cached(Lifetime, AnyArc),
    Build(crate::registration::ResolutionPlan),
}

impl Container {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            parameters: RwLock::new(Map::new()),
            environments: Mutex::new(EnvironmentManager::new()),
            observers: RwLock::new(Observers::new()),
        }
    }

    /// Creates a container seeded with parameters, in iteration order.
    ///
    /// ```
    /// use bowl::Container;
    /// use serde_json::json;
    ///
    /// let container = Container::with_parameters([("foo", json!("bar")), ("baz", json!(true))]);
    /// assert_eq!(
    ///     container.parameters(),
    ///     vec![("foo".to_string(), json!("bar")), ("baz".to_string(), json!(true))]
    /// );
    /// ```
    pub fn with_parameters<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let container = Self::new();
        {
            let mut store = container.parameters.write();
            for (key, value) in parameters {
                store.insert(key.into(), value.into());
            }
        }
        container
    }

    /// Attaches an observer for resolution and environment events.
    pub fn add_observer(&self, observer: Arc<dyn ContainerObserver>) -> &Self {
        self.observers.write().add(observer);
        self
    }

    // ----- Registration -----

    /// Registers (or replaces) a shared service.
    ///
    /// The factory runs on the first `get`; its extended result is cached and
    /// returned by every later `get` until [`reset`](Self::reset).
    pub fn share<T, F>(&self, name: &str, tags: &[&str], factory: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        self.define(name, tags, Lifetime::Shared, erase(factory))
    }

    /// Registers (or replaces) a factory service, built fresh on every `get`.
    pub fn factory<T, F>(&self, name: &str, tags: &[&str], factory: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        self.define(name, tags, Lifetime::Factory, erase(factory))
    }

    fn define(&self, name: &str, tags: &[&str], lifetime: Lifetime, ctor: Ctor) -> DiResult<&Self> {
        validate(KeyKind::Service, name)?;
        for tag in tags {
            validate(KeyKind::Tag, tag)?;
        }

        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        debug!(service = name, %lifetime, ?tags, "registering service");
        self.registry
            .write()
            .insert(name, Registration::new(lifetime, ctor, tags));
        Ok(self)
    }

    /// Appends an extension to an existing service.
    ///
    /// Extensions run in registration order right after the factory builds
    /// an instance, each receiving the previous result. They run once per
    /// physical instantiation: a cache hit skips them. Extending a shared
    /// service drops its cached instance so the next `get` sees the full
    /// chain.
    ///
    /// ```
    /// use bowl::Container;
    /// use std::sync::Arc;
    ///
    /// let container = Container::new();
    /// container.share("greeting", &[], |_| Ok("hello".to_string())).unwrap();
    /// container
    ///     .extend::<String, _>("greeting", |s, _| Arc::new(format!("{s}, world")))
    ///     .unwrap();
    ///
    /// assert_eq!(*container.get::<String>("greeting").unwrap(), "hello, world");
    /// assert_eq!(*container.get::<String>("greeting").unwrap(), "hello, world");
    /// ```
    pub fn extend<T, F>(&self, name: &str, extension: F) -> DiResult<&Self>
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, &Container) -> Arc<T> + Send + Sync + 'static,
    {
        validate(KeyKind::Service, name)?;

        let owner = name.to_string();
        let extension: Extension = Arc::new(move |instance: AnyArc, container: &Container| {
            let typed = instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
                name: owner.clone(),
                expected: type_name::<T>(),
            })?;
            Ok(extension(typed, container) as AnyArc)
        });

        if !self.registry.write().push_extension(name, extension) {
            return Err(DiError::UnknownService(name.to_string()));
        }
        debug!(service = name, "extended service");
        Ok(self)
    }

    /// Drops the cached instance of a shared service.
    ///
    /// Returns the container so a `get` can follow directly. Resetting a
    /// factory service is accepted and has no effect.
    pub fn reset(&self, name: &str) -> DiResult<&Self> {
        validate(KeyKind::Service, name)?;
        if !self.registry.write().clear_cache(name) {
            return Err(DiError::UnknownService(name.to_string()));
        }
        debug!(service = name, "reset service");
        Ok(self)
    }

    // ----- Resolution -----

    /// Resolves a service and downcasts it to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        self.get_any(name)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Resolves a service as a type-erased instance.
    ///
    /// Shared services return their cached instance when present. Otherwise
    /// the factory runs, then every extension in order, and a shared result
    /// is cached. A failing factory or extension leaves the cache empty.
    pub fn get_any(&self, name: &str) -> DiResult<AnyArc> {
        validate(KeyKind::Service, name)?;

        let observers = self.observers_snapshot();
        if let Some(observers) = &observers {
            observers.resolving(name);
        }
        let started = Instant::now();

        let lookup = self.lookup(name)?;
        let (lifetime, instance, cache_hit) = match lookup {
            Lookup::Cached(lifetime, instance) => {
                trace!(service = name, "cache hit");
                (lifetime, instance, true)
            }
            Lookup::Build(plan) => {
                let mut instance = (plan.ctor)(self)?;
                for extension in &plan.extensions {
                    instance = extension(instance, self)?;
                }
                if plan.lifetime.is_cached() {
                    instance = self.registry.write().store(name, plan.generation, instance);
                }
                (plan.lifetime, instance, false)
            }
        };

        if let Some(observers) = &observers {
            observers.resolved(name, lifetime, cache_hit, started.elapsed());
        }
        Ok(instance)
    }

    fn lookup(&self, name: &str) -> DiResult<Lookup> {
        let registry = self.registry.read();
        let registration = registry
            .get(name)
            .ok_or_else(|| DiError::UnknownService(name.to_string()))?;

        if let Some(cached) = &registration.cached {
            return Ok(Lookup::Cached(registration.lifetime, cached.clone()));
        }
        registry
            .plan(name)
            .map(Lookup::Build)
            .ok_or_else(|| DiError::UnknownService(name.to_string()))
    }

    fn observers_snapshot(&self) -> Option<Observers> {
        let observers = self.observers.read();
        observers.has_observers().then(|| observers.clone())
    }

    /// Whether a service is registered under `name`.
    pub fn contains_service(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    // ----- Tags -----

    /// Returns a lazy view over the services holding `tag`.
    ///
    /// Unknown tags yield an empty view.
    pub fn tagged(&self, tag: &str) -> DiResult<TaggedServices<'_>> {
        validate(KeyKind::Tag, tag)?;
        let names = self.registry.read().tagged(tag);
        Ok(TaggedServices::new(self, names))
    }

    // ----- Environments -----

    /// Registers (or replaces) the configuration callback for an environment.
    ///
    /// The callback only runs when the environment is activated with
    /// [`env`](Self::env).
    pub fn configure<F>(&self, name: &str, callback: F) -> DiResult<&Self>
    where
        F: Fn(&Container) -> DiResult<()> + Send + Sync + 'static,
    {
        validate(KeyKind::Environment, name)?;
        self.environments.lock().configure(name, Arc::new(callback));
        debug!(environment = name, "configured environment");
        Ok(self)
    }

    /// Activates an environment, running its callback synchronously.
    ///
    /// The first successful activation commits the container to that
    /// environment. Activating it again is a no-op that does not re-run the
    /// callback; asking for any other environment fails with
    /// `EnvironmentConflict`. If the callback itself fails the environment
    /// stays committed and the error is returned.
    ///
    /// ```
    /// use bowl::{Container, DiError};
    ///
    /// let container = Container::new();
    /// container.configure("prod", |c| {
    ///     c.set_parameter("debug", false);
    ///     Ok(())
    /// }).unwrap();
    /// container.configure("dev", |c| {
    ///     c.set_parameter("debug", true);
    ///     Ok(())
    /// }).unwrap();
    ///
    /// container.env("prod").unwrap();
    /// container.env("prod").unwrap();
    /// assert!(matches!(container.env("dev"), Err(DiError::EnvironmentConflict { .. })));
    /// assert_eq!(container.parameter("debug").unwrap(), false);
    /// ```
    pub fn env(&self, name: &str) -> DiResult<()> {
        validate(KeyKind::Environment, name)?;

        let activation = self.environments.lock().activate(name)?;
        let callback = match activation {
            Activation::AlreadyActive => {
                trace!(environment = name, "environment already active");
                return Ok(());
            }
            Activation::Activated(callback) => callback,
        };

        debug!(environment = name, "activating environment");
        callback(self)?;

        if let Some(observers) = self.observers_snapshot() {
            observers.environment_activated(name);
        }
        Ok(())
    }

    /// Fails exactly when [`env`](Self::env) would fail before running a
    /// callback. Nothing is committed.
    pub(crate) fn check_environment(&self, name: &str) -> DiResult<()> {
        validate(KeyKind::Environment, name)?;
        self.environments.lock().check(name).map(|_| ())
    }

    /// Name of the committed environment, if any.
    pub fn active_environment(&self) -> Option<String> {
        self.environments.lock().active().map(str::to_string)
    }

    /// Configured environment names, in configuration order.
    pub fn environments(&self) -> Vec<String> {
        self.environments.lock().names()
    }

    // ----- Introspection -----

    /// Describes every service, in first-registration order.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .read()
            .iter()
            .map(|(name, registration)| describe(name, registration))
            .collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<ServiceDescriptor> {
        self.registry
            .read()
            .get(name)
            .map(|registration| describe(name, registration))
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.descriptors().len())
            .field("parameters", &self.parameters.read().len())
            .field("environment", &self.active_environment())
            .finish()
    }
}

fn erase<T, F>(factory: F) -> Ctor
where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| factory(container).map(|value| Arc::new(value) as AnyArc))
}

fn describe(name: &str, registration: &Registration) -> ServiceDescriptor {
    ServiceDescriptor {
        name: name.to_string(),
        lifetime: registration.lifetime,
        tags: registration.tags.clone(),
        extensions: registration.extensions.len(),
        cached: registration.cached.is_some(),
    }
}
