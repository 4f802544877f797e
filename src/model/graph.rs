use rayon::prelude::*;
use tracing::debug;

use super::{Entity, EntityId, Identity, RecordCounter, RecordNumber};
use crate::error::EncodeError;
use crate::step::{render_as, EncodeOptions, StepEncoder};

/// Looks up the identity of a referenced entity.
///
/// This is the only thing the encoder needs from the entity graph.
pub trait IdentityResolver {
    /// `None` when `id` is not part of the graph.
    fn identity(&self, id: EntityId) -> Option<&Identity>;
}

/// All entities written to one STEP file.
#[derive(Debug, Default)]
pub struct EntityGraph {
    entities: Vec<Entity>,
}

impl EntityGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        self.entities.push(entity);
        id
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i), e))
    }

    /// Numbers every entity from 1 in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::RecordNumbersExhausted`] if the counter runs out.
    pub fn assign_record_numbers(&mut self) -> Result<RecordCounter, EncodeError> {
        let mut counter = RecordCounter::new();
        self.assign_record_numbers_with(&mut counter)?;
        Ok(counter)
    }

    /// Numbers every entity in insertion order, continuing from `counter`.
    ///
    /// Existing record numbers are overwritten, so a graph can be written
    /// again in a new session.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::RecordNumbersExhausted`] if `counter` runs out.
    pub fn assign_record_numbers_with(
        &mut self,
        counter: &mut RecordCounter,
    ) -> Result<(), EncodeError> {
        for entity in &mut self.entities {
            entity.identity.assign_record_number(counter.next_number()?);
        }
        debug!(
            entities = self.entities.len(),
            issued = counter.issued(),
            "assigned record numbers"
        );
        Ok(())
    }

    /// Entities in ascending record-number order.
    ///
    /// Entities without a record number are not included.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::DuplicateRecordNumber`] if two entities share
    /// a record number.
    pub fn in_record_order(&self) -> Result<Vec<(RecordNumber, &Entity)>, EncodeError> {
        let mut numbered: Vec<(RecordNumber, &Entity)> = self
            .entities
            .iter()
            .filter_map(|e| e.identity.record_number().map(|n| (n, e)))
            .collect();
        numbered.sort_by_key(|(n, _)| *n);
        check_unique(numbered.iter().map(|(n, _)| *n))?;
        Ok(numbered)
    }

    /// Renders every entity to its record line, in ascending record order.
    ///
    /// Record numbers must be assigned first and be unique. Rendering only
    /// reads identities, so lines are produced in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnassignedRecordNumber`] for an unnumbered
    /// entity, [`EncodeError::DuplicateRecordNumber`] if two entities share a
    /// number, or any attribute encoding error.
    pub fn render_all(&self, options: EncodeOptions) -> Result<Vec<String>, EncodeError> {
        let encoder = StepEncoder::new(self).with_options(options);

        let mut lines: Vec<(RecordNumber, String)> = self
            .entities
            .par_iter()
            .map(|entity| {
                let number = entity.identity.record_number().ok_or_else(|| {
                    EncodeError::UnassignedRecordNumber {
                        type_name: entity.type_name.clone(),
                    }
                })?;
                Ok((number, render_as(number, entity, &encoder)?))
            })
            .collect::<Result<_, EncodeError>>()?;

        lines.sort_by_key(|(n, _)| *n);
        check_unique(lines.iter().map(|(n, _)| *n))?;
        debug!(records = lines.len(), "rendered entity graph");

        Ok(lines.into_iter().map(|(_, line)| line).collect())
    }
}

/// Fails on the first repeated number in an ascending sequence.
fn check_unique(sorted: impl Iterator<Item = RecordNumber>) -> Result<(), EncodeError> {
    let mut previous = None;
    for number in sorted {
        if previous == Some(number) {
            return Err(EncodeError::DuplicateRecordNumber { number });
        }
        previous = Some(number);
    }
    Ok(())
}

impl IdentityResolver for EntityGraph {
    fn identity(&self, id: EntityId) -> Option<&Identity> {
        self.get(id).map(|e| &e.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use pretty_assertions::assert_eq;

    fn wall_graph() -> (EntityGraph, EntityId, EntityId) {
        let mut graph = EntityGraph::new();
        let storey = graph.add(Entity::new(
            "IfcBuildingStorey",
            vec![Value::from("Level 1"), Value::Real(3000.0)],
        ));
        let wall = graph.add(Entity::new(
            "IfcWall",
            vec![Value::from("Wall-01"), Value::Null, Value::Reference(storey)],
        ));
        (graph, storey, wall)
    }

    #[test]
    fn test_assign_record_numbers() {
        let (mut graph, storey, wall) = wall_graph();
        let counter = graph.assign_record_numbers().unwrap();

        assert_eq!(counter.issued(), 2);
        let number = |id| {
            graph
                .identity(id)
                .and_then(Identity::record_number)
                .map(RecordNumber::get)
        };
        assert_eq!(number(storey), Some(1));
        assert_eq!(number(wall), Some(2));
    }

    #[test]
    fn test_render_all() {
        let (mut graph, _, _) = wall_graph();
        graph.assign_record_numbers().unwrap();

        let lines = graph.render_all(EncodeOptions::default()).unwrap();
        assert_eq!(
            lines,
            vec![
                "#1 = IFCBUILDINGSTOREY('Level 1',3000.0);".to_string(),
                "#2 = IFCWALL('Wall-01',$,#1);".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_all_follows_record_order() {
        let (mut graph, storey, wall) = wall_graph();
        let mut counter = RecordCounter::new();
        for id in [wall, storey] {
            let number = counter.next_number().unwrap();
            graph.get_mut(id).unwrap().identity.assign_record_number(number);
        }

        let lines = graph.render_all(EncodeOptions::default()).unwrap();
        assert_eq!(lines[0], "#1 = IFCWALL('Wall-01',$,#2);");
        assert_eq!(lines[1], "#2 = IFCBUILDINGSTOREY('Level 1',3000.0);");
    }

    #[test]
    fn test_render_all_requires_record_numbers() {
        let (graph, _, _) = wall_graph();
        let err = graph.render_all(EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, EncodeError::UnassignedRecordNumber { .. }));
    }

    #[test]
    fn test_reassignment_continues_counter() {
        let (mut graph, storey, _) = wall_graph();
        let mut counter = RecordCounter::starting_at(RecordNumber::new(10).unwrap());
        graph.assign_record_numbers_with(&mut counter).unwrap();

        assert_eq!(
            graph.get(storey).unwrap().identity.record_number(),
            RecordNumber::new(10)
        );
        assert_eq!(graph.in_record_order().unwrap().len(), 2);
    }

    #[test]
    fn test_shared_record_number_is_rejected() {
        let (mut graph, storey, wall) = wall_graph();
        let one = RecordNumber::new(1).unwrap();
        for id in [storey, wall] {
            graph.get_mut(id).unwrap().identity.assign_record_number(one);
        }

        let expected = EncodeError::DuplicateRecordNumber { number: one };
        assert_eq!(
            graph.render_all(EncodeOptions::default()),
            Err(expected.clone())
        );
        assert_eq!(graph.in_record_order().map(|v| v.len()), Err(expected));
        assert_eq!(
            EncodeError::DuplicateRecordNumber { number: one }.to_string(),
            "record number #1 is assigned to more than one entity"
        );

        // renumbering the whole graph clears the clash
        graph.assign_record_numbers().unwrap();
        assert_eq!(graph.render_all(EncodeOptions::default()).unwrap().len(), 2);
    }
}
