use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Identity, Value};

/// Handle to an entity inside an [`EntityGraph`](super::EntityGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A typed record with its attributes in schema order.
///
/// STEP parameters are positional, so `attributes` must follow the order the
/// schema declares them in.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub type_name: String,
    pub attributes: Vec<Value>,
    pub identity: Identity,
}

impl Entity {
    /// New entity with a fresh identity.
    #[must_use]
    pub fn new(type_name: impl Into<String>, attributes: Vec<Value>) -> Self {
        Self::with_identity(type_name, attributes, Identity::new())
    }

    #[must_use]
    pub fn with_identity(
        type_name: impl Into<String>,
        attributes: Vec<Value>,
        identity: Identity,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            attributes,
            identity,
        }
    }

    /// The schema type name as written in STEP, e.g. `IfcWall` -> `IFCWALL`.
    #[must_use]
    pub fn type_tag(&self) -> String {
        self.type_name.to_uppercase()
    }
}
