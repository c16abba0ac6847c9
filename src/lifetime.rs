//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use bowl::{Container, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Request { id: u32 }
///
/// let container = Container::new();
/// container.share("db", &[], |_| Ok(Database { url: "postgres://localhost".into() })).unwrap();
/// container.factory("request", &[], |_| Ok(Request { id: 7 })).unwrap();
///
/// // Shared: same instance until reset
/// let db1 = container.get::<Database>("db").unwrap();
/// let db2 = container.get::<Database>("db").unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Factory: fresh instance every time
/// let r1 = container.get::<Request>("request").unwrap();
/// let r2 = container.get::<Request>("request").unwrap();
/// assert!(!Arc::ptr_eq(&r1, &r2));
///
/// assert_eq!(container.descriptor("db").unwrap().lifetime, Lifetime::Shared);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Created on first resolution and cached until `reset`
    ///
    /// The cached value is the fully extended instance, so a cache hit skips
    /// both the factory and the extension chain.
    Shared,
    /// New instance per resolution, never cached
    ///
    /// Extensions run against every fresh instance.
    Factory,
}

impl Lifetime {
    /// Whether resolved instances are kept in the definition's cache slot.
    #[inline]
    pub fn is_cached(self) -> bool {
        matches!(self, Lifetime::Shared)
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Shared => f.write_str("shared"),
            Lifetime::Factory => f.write_str("factory"),
        }
    }
}
