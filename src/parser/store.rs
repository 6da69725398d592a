//! Indexed, read-only entity graph built once per invocation.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::FormatError;
use crate::parser::step::{StepEntity, StepFile};
use crate::parser::units::length_unit_scale;

/// The two supported, mutually incompatible schema revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaRevision {
    #[serde(rename = "IFC2X3")]
    Ifc2x3,
    #[serde(rename = "IFC4")]
    Ifc4,
}

impl SchemaRevision {
    /// Maps a `FILE_SCHEMA` identifier to a revision. IFC4 addenda (IFC4X1..IFC4X3)
    /// share the IFC4 MEP entity set.
    pub fn detect(schema: &str) -> Result<Self, FormatError> {
        let upper = schema.trim().to_ascii_uppercase();
        if upper.starts_with("IFC2X3") {
            Ok(SchemaRevision::Ifc2x3)
        } else if upper.starts_with("IFC4") {
            Ok(SchemaRevision::Ifc4)
        } else {
            Err(FormatError::UnsupportedSchema {
                schema: schema.to_string(),
            })
        }
    }
}

impl std::fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaRevision::Ifc2x3 => write!(f, "IFC2X3"),
            SchemaRevision::Ifc4 => write!(f, "IFC4"),
        }
    }
}

#[derive(Debug)]
pub struct EntityStore {
    schema: SchemaRevision,
    schema_name: String,
    length_scale: f64,
    entities: Vec<StepEntity>,
    by_id: HashMap<u64, usize>,
    by_type: HashMap<String, Vec<usize>>,
    // element id -> indices of its attached property definitions
    definitions: HashMap<u64, Vec<usize>>,
}

impl EntityStore {
    /// Parses a byte buffer into an indexed entity graph in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the buffer is not UTF-8, is not valid STEP, or
    /// declares a schema other than IFC2X3 / IFC4.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let content = std::str::from_utf8(bytes).map_err(|e| FormatError::Encoding {
            offset: e.valid_up_to(),
        })?;
        Self::from_step(StepFile::parse(content)?)
    }

    pub fn from_step(step_file: StepFile) -> Result<Self, FormatError> {
        let schema = SchemaRevision::detect(&step_file.schema)?;

        let mut by_id = HashMap::with_capacity(step_file.entities.len());
        let mut by_type: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entity) in step_file.entities.iter().enumerate() {
            by_id.insert(entity.id, index);
            by_type
                .entry(entity.entity_type.clone())
                .or_default()
                .push(index);
        }

        let mut store = EntityStore {
            schema,
            schema_name: step_file.schema,
            length_scale: 1.0,
            entities: step_file.entities,
            by_id,
            by_type,
            definitions: HashMap::new(),
        };
        store.definitions = store.index_property_definitions();
        store.length_scale = length_unit_scale(&store);

        tracing::debug!(
            schema = %store.schema,
            entities = store.entities.len(),
            length_scale = store.length_scale,
            "entity store built"
        );

        Ok(store)
    }

    /// IFCRELDEFINESBYPROPERTIES: RelatedObjects at index 4, RelatingPropertyDefinition at 5.
    fn index_property_definitions(&self) -> HashMap<u64, Vec<usize>> {
        let mut definitions: HashMap<u64, Vec<usize>> = HashMap::new();

        for rel in self.entities_of_type("IFCRELDEFINESBYPROPERTIES") {
            let Some(definition) = rel.get_ref(5).and_then(|id| self.by_id.get(&id)) else {
                continue;
            };
            for element_id in rel.get_refs(4) {
                definitions.entry(element_id).or_default().push(*definition);
            }
        }

        definitions
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRevision {
        self.schema
    }

    /// Schema identifier exactly as declared in the header.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Factor converting model length units to metres.
    #[must_use]
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&StepEntity> {
        self.by_id.get(&id).map(|&index| &self.entities[index])
    }

    /// Entities with the given type tag, in declaration order.
    pub fn entities_of_type<'a>(
        &'a self,
        entity_type: &str,
    ) -> impl Iterator<Item = &'a StepEntity> + 'a {
        self.by_type
            .get(entity_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&index| &self.entities[index])
    }

    #[must_use]
    pub fn count_of_type(&self, entity_type: &str) -> usize {
        self.by_type.get(entity_type).map_or(0, Vec::len)
    }

    /// Property sets and element quantities attached to `entity_id`, in
    /// relation declaration order.
    pub fn relations_of(&self, entity_id: u64) -> impl Iterator<Item = &StepEntity> + '_ {
        self.definitions
            .get(&entity_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&index| &self.entities[index])
    }
}
