use crate::error::ExportError;
use crate::model::EntityGraph;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Writes a CSV table mapping each record number to its entity type, GUID
/// and compressed GlobalId, in record order.
pub fn export_guid_manifest<P: AsRef<Path>>(
    graph: &EntityGraph,
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["Record", "Type", "Guid", "GlobalId"])?;

    let records = graph.in_record_order()?;
    for (number, entity) in &records {
        let global_id = entity.identity.global_id()?;
        writer.write_record([
            number.to_string(),
            entity.type_tag(),
            entity.identity.guid().to_string(),
            global_id.to_string(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    info!(path = %path_ref.display(), rows = records.len(), "exported GUID manifest");
    Ok(())
}
