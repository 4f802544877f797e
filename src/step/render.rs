use crate::error::EncodeError;
use crate::model::{Entity, IdentityResolver, RecordNumber};

use super::encode::StepEncoder;

/// Assembles one record line from already encoded parameters.
///
/// ```
/// use ifc_writer::model::RecordNumber;
/// use ifc_writer::step::render_record;
///
/// let params = ["'Wall-01'".to_string(), "$".to_string(), "#3".to_string()];
/// let line = render_record(RecordNumber::new(7).unwrap(), "IfcWall", &params);
/// assert_eq!(line, "#7 = IFCWALL('Wall-01',$,#3);");
/// ```
#[must_use]
pub fn render_record(record: RecordNumber, type_tag: &str, params: &[String]) -> String {
    format!("{record} = {}({});", type_tag.to_uppercase(), params.join(","))
}

/// Renders `entity` as `#N = TYPE(params);`.
///
/// Attributes are encoded in the order they are stored, which must be the
/// schema order.
///
/// # Errors
///
/// Returns [`EncodeError::UnassignedRecordNumber`] if the entity has no
/// record number, or any error from encoding one of its attributes.
pub fn render<R: IdentityResolver + ?Sized>(
    entity: &Entity,
    encoder: &StepEncoder<'_, R>,
) -> Result<String, EncodeError> {
    let record = entity.identity.record_number().ok_or_else(|| {
        EncodeError::UnassignedRecordNumber {
            type_name: entity.type_name.clone(),
        }
    })?;

    render_as(record, entity, encoder)
}

/// Renders `entity` under an already resolved record number.
///
/// # Errors
///
/// Returns any error from encoding one of the entity's attributes.
pub fn render_as<R: IdentityResolver + ?Sized>(
    record: RecordNumber,
    entity: &Entity,
    encoder: &StepEncoder<'_, R>,
) -> Result<String, EncodeError> {
    let params = entity
        .attributes
        .iter()
        .map(|value| encoder.encode(value, false))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(render_record(record, &entity.type_name, &params))
}
