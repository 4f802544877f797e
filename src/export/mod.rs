pub mod manifest;
pub mod step;

pub use crate::error::ExportError;
pub use manifest::export_guid_manifest;
pub use step::{export_step, write_lines};
