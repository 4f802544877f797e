pub mod document;

pub use crate::error::LoadError;
pub use document::{load_graph_file, parse_graph_document, EntityDoc, GraphDocument};
