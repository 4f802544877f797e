use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::LoadError;
use crate::guid;
use crate::model::{Entity, EntityGraph, Identity, Value};

/// Attribute placeholder replaced by the owning entity's compressed GUID.
const GLOBAL_ID_KIND: &str = "global_id";

/// JSON description of an entity graph.
///
/// ```json
/// { "entities": [
///     { "type": "IfcBuildingStorey", "attributes": [{"kind": "string", "value": "Level 1"}] },
///     { "type": "IfcWall",
///       "guid": "75f9cd1c-b2a5-4b43-8d9a-4ca5d0c0d8b8",
///       "attributes": [{"kind": "global_id"}, {"kind": "reference", "value": 0}] }
/// ] }
/// ```
#[derive(Debug, Deserialize)]
pub struct GraphDocument {
    pub entities: Vec<EntityDoc>,
}

#[derive(Debug, Deserialize)]
pub struct EntityDoc {
    #[serde(rename = "type")]
    pub type_name: String,
    /// UUID or 22-character GlobalId. A random GUID is generated if absent.
    #[serde(default)]
    pub guid: Option<String>,
    /// Attribute values in schema order. References are indices into
    /// `entities`; `{"kind": "global_id"}` may appear at any depth.
    #[serde(default)]
    pub attributes: Vec<serde_json::Value>,
}

/// Loads an entity graph from a JSON document on disk.
///
/// # Errors
///
/// Returns [`LoadError::FileRead`] if the file cannot be read, and any
/// error of [`parse_graph_document`].
pub fn load_graph_file<P: AsRef<Path>>(path: P) -> Result<EntityGraph, LoadError> {
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    let graph = parse_graph_document(&content)?;
    debug!(
        path = %path.as_ref().display(),
        entities = graph.len(),
        "loaded entity graph"
    );
    Ok(graph)
}

/// Builds an entity graph from JSON text.
///
/// # Errors
///
/// Returns [`LoadError::Json`] for malformed JSON, [`LoadError::Attribute`]
/// for an attribute with an unknown value kind or a bad payload,
/// [`LoadError::Guid`] for an unreadable `guid`, and
/// [`LoadError::DanglingReference`] for a reference outside the document.
pub fn parse_graph_document(content: &str) -> Result<EntityGraph, LoadError> {
    let document: GraphDocument = serde_json::from_str(content)?;
    let count = document.entities.len();

    let mut graph = EntityGraph::new();
    for (index, doc) in document.entities.into_iter().enumerate() {
        let identity = match &doc.guid {
            Some(text) => guid::parse_any(text)
                .map(Identity::with_guid)
                .map_err(|source| LoadError::Guid {
                    entity: index,
                    source,
                })?,
            None => Identity::new(),
        };

        let global_id = identity.global_id().map_err(|source| LoadError::Encode {
            entity: index,
            source,
        })?;

        let mut attributes = Vec::with_capacity(doc.attributes.len());
        for mut raw in doc.attributes {
            resolve_global_ids(&mut raw, global_id.as_str());
            let value: Value =
                serde_json::from_value(raw).map_err(|source| LoadError::Attribute {
                    entity: index,
                    source,
                })?;
            check_references(&value, index, count)?;
            attributes.push(value);
        }

        graph.add(Entity::with_identity(doc.type_name, attributes, identity));
    }

    Ok(graph)
}

/// Replaces every `{"kind": "global_id"}` placeholder, at any depth, with
/// the owning entity's GlobalId as a string value.
fn resolve_global_ids(raw: &mut serde_json::Value, global_id: &str) {
    match raw {
        serde_json::Value::Object(map) => {
            if map.get("kind").and_then(serde_json::Value::as_str) == Some(GLOBAL_ID_KIND) {
                *raw = serde_json::json!({ "kind": "string", "value": global_id });
            } else {
                map.values_mut()
                    .for_each(|v| resolve_global_ids(v, global_id));
            }
        }
        serde_json::Value::Array(items) => items
            .iter_mut()
            .for_each(|v| resolve_global_ids(v, global_id)),
        _ => {}
    }
}

fn check_references(value: &Value, entity: usize, count: usize) -> Result<(), LoadError> {
    match value {
        Value::Reference(target) if target.0 >= count => Err(LoadError::DanglingReference {
            entity,
            target: target.0,
            count,
        }),
        Value::List(items) => items
            .iter()
            .try_for_each(|item| check_references(item, entity, count)),
        Value::Typed { value, .. } | Value::Select(value) => {
            check_references(value, entity, count)
        }
        _ => Ok(()),
    }
}
