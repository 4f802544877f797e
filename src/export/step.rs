use crate::error::ExportError;
use crate::model::EntityGraph;
use crate::step::EncodeOptions;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes every record of `graph` to `path`, one line each, in ascending
/// record order. Header and footer sections are not written.
///
/// Record numbers must already be assigned.
pub fn export_step<P: AsRef<Path>>(
    graph: &EntityGraph,
    options: EncodeOptions,
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let lines = graph.render_all(options)?;

    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    write_lines(BufWriter::new(file), &lines)?;

    info!(path = %path_ref.display(), records = lines.len(), "exported STEP records");
    Ok(())
}

/// Writes rendered record lines to any writer.
pub fn write_lines<W: Write>(mut writer: W, lines: &[String]) -> Result<(), ExportError> {
    let to_write_error = |e: std::io::Error| ExportError::WriteError {
        message: e.to_string(),
    };

    for line in lines {
        writeln!(writer, "{line}").map_err(to_write_error)?;
    }
    writer.flush().map_err(to_write_error)?;

    Ok(())
}
