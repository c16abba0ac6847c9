//! Service descriptors for introspection and diagnostics.

use crate::lifetime::Lifetime;

/// Snapshot of one service definition
///
/// # Examples
///
/// ```rust
/// use bowl::{Container, Lifetime};
///
/// let container = Container::new();
/// container.share("db", &["infra"], |_| Ok(5432u16)).unwrap();
/// container.factory("request_id", &[], |_| Ok(1u64)).unwrap();
/// container.get::<u16>("db").unwrap();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let db = &descriptors[0];
/// assert_eq!(db.name, "db");
/// assert_eq!(db.lifetime, Lifetime::Shared);
/// assert!(db.has_tag("infra"));
/// assert!(db.cached);
///
/// let shared_count = descriptors
///     .iter()
///     .filter(|d| d.lifetime == Lifetime::Shared)
///     .count();
/// assert_eq!(shared_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service name
    pub name: String,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Tags fixed at definition time
    pub tags: Vec<String>,
    /// Number of registered extensions
    pub extensions: usize,
    /// Whether a shared instance is currently cached
    pub cached: bool,
}

impl ServiceDescriptor {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
