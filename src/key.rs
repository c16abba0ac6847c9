//! Identifier rules for service names, tags and environments.
//!
//! Services, tags and environments share a flat namespace that must never
//! contain [`SEPARATOR`]. Parameters are free to use it, which is how
//! dotted parameter keys such as `db.host` stay out of the service namespace.

use crate::error::{DiError, DiResult};

/// Reserved separator character.
pub const SEPARATOR: char = '.';

/// Kind of identifier being validated, selects the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyKind {
    Service,
    Tag,
    Environment,
}

/// Returns `true` if `name` is usable as a service, tag or environment name.
///
/// ```rust
/// use bowl::key::is_valid_name;
///
/// assert!(is_valid_name("mailer"));
/// assert!(!is_valid_name("mailer.transport"));
/// ```
#[inline]
pub fn is_valid_name(name: &str) -> bool {
    !name.contains(SEPARATOR)
}

#[inline]
pub(crate) fn validate(kind: KeyKind, name: &str) -> DiResult<()> {
    if is_valid_name(name) {
        return Ok(());
    }
    Err(match kind {
        KeyKind::Service => DiError::InvalidName(name.to_string()),
        KeyKind::Tag => DiError::InvalidTag(name.to_string()),
        KeyKind::Environment => DiError::InvalidEnvironment(name.to_string()),
    })
}
