//! # IFC Writer
//!
//! Writes IFC entity graphs as ISO-10303-21 (STEP) records.
//!
//! ## Features
//!
//! - Encode typed attribute values as STEP literals
//! - Render `#N = TYPE(...);` record lines with sequential record numbers
//! - Compress GUIDs to the 22-character IFC GlobalId form and back
//! - Load entity graphs from JSON, export records and a GUID manifest
//!
//! ## Example
//!
//! ```
//! use ifc_writer::model::{Entity, EntityGraph, Value};
//! use ifc_writer::step::EncodeOptions;
//!
//! let mut graph = EntityGraph::new();
//! let storey = graph.add(Entity::new("IfcBuildingStorey", vec![Value::from("Level 1")]));
//! graph.add(Entity::new(
//!     "IfcWall",
//!     vec![Value::from("Wall-01"), Value::Null, Value::Reference(storey)],
//! ));
//! graph.assign_record_numbers().unwrap();
//!
//! let lines = graph.render_all(EncodeOptions::default()).unwrap();
//! assert_eq!(lines[1], "#2 = IFCWALL('Wall-01',$,#1);");
//! ```

pub mod error;
pub mod export;
pub mod guid;
pub mod loader;
pub mod model;
pub mod step;
