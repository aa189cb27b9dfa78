//! Element identity
//!
//! Elements created during authoring get client-local IDs; elements loaded
//! from the backend carry its authoritative IDs. The two never mix: save
//! resolves local IDs into persisted ones explicitly, there is no string
//! prefix sniffing.

use std::fmt;

/// Identity of a layout element (area, table, or seat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    /// Client-generated, valid only inside one in-memory model
    Local(u64),
    /// Backend-assigned, stable across reloads
    Persisted(i64),
}

impl ElementId {
    /// Backend ID, if this element has been persisted
    pub fn persisted(self) -> Option<i64> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Local(_) => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(n) => write!(f, "local:{n}"),
            Self::Persisted(n) => write!(f, "persisted:{n}"),
        }
    }
}
