//! Lazy view over the services holding a tag.

use std::any::type_name;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::registration::AnyArc;

/// Forward cursor over the instances of every service holding a tag.
///
/// The member list is a snapshot taken when the view is created; services
/// tagged afterwards do not show up. Instances are resolved on access, with
/// the same side effects as [`Container::get_any`]: shared members come from
/// the cache, factory members are built fresh on every [`current`](Self::current).
///
/// # Examples
///
/// ```
/// use bowl::Container;
///
/// let container = Container::new();
/// container.share("smtp", &["transport"], |_| Ok("smtp".to_string())).unwrap();
/// container.share("sendmail", &["transport"], |_| Ok("sendmail".to_string())).unwrap();
///
/// let mut transports = container.tagged("transport").unwrap();
/// assert_eq!(transports.count(), 2);
///
/// let mut seen = Vec::new();
/// while transports.valid() {
///     seen.push(transports.current_as::<String>().unwrap());
///     transports.advance();
/// }
/// assert_eq!(*seen[0], "smtp");
/// assert_eq!(*seen[1], "sendmail");
///
/// // The view can be replayed after a rewind
/// transports.rewind();
/// assert!(transports.valid());
/// ```
pub struct TaggedServices<'a> {
    container: &'a Container,
    names: Vec<String>,
    position: usize,
}

impl<'a> TaggedServices<'a> {
    pub(crate) fn new(container: &'a Container, names: Vec<String>) -> Self {
        Self {
            container,
            names,
            position: 0,
        }
    }

    /// Number of members in the snapshot.
    #[inline]
    pub fn count(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Member names in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the cursor points at a member.
    #[inline]
    pub fn valid(&self) -> bool {
        self.position < self.names.len()
    }

    /// Cursor position.
    #[inline]
    pub fn key(&self) -> usize {
        self.position
    }

    /// Resolves the member under the cursor.
    ///
    /// Fails with `ViewExhausted` when the cursor is past the end.
    pub fn current(&self) -> DiResult<AnyArc> {
        match self.names.get(self.position) {
            Some(name) => self.container.get_any(name),
            None => Err(DiError::ViewExhausted {
                position: self.position,
                count: self.names.len(),
            }),
        }
    }

    /// Resolves the member under the cursor and downcasts it.
    pub fn current_as<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let name = self.names.get(self.position).cloned().unwrap_or_default();
        self.current()?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                name,
                expected: type_name::<T>(),
            })
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Moves the cursor back to the first member.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Resolves every member from the start, independent of the cursor.
    pub fn iter(&self) -> impl Iterator<Item = DiResult<AnyArc>> + '_ {
        self.names.iter().map(move |name| self.container.get_any(name))
    }

    /// Resolves every member as `T`, stopping at the first failure.
    pub fn collect_as<T: Send + Sync + 'static>(&self) -> DiResult<Vec<Arc<T>>> {
        self.names
            .iter()
            .map(|name| self.container.get::<T>(name))
            .collect()
    }
}

impl std::fmt::Debug for TaggedServices<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedServices")
            .field("names", &self.names)
            .field("position", &self.position)
            .finish()
    }
}
