pub mod entity;
pub mod graph;
pub mod identity;
pub mod value;

pub use entity::{Entity, EntityId};
pub use graph::{EntityGraph, IdentityResolver};
pub use identity::{Identity, RecordCounter, RecordNumber};
pub use value::Value;
