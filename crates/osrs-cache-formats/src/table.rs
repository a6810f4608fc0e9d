//! Dense id-indexed definition tables
//!
//! Cache indices skip ids (texture 54 has never existed, for example), so a
//! table is a dense vector of optional slots sized to the largest decoded id.

use std::collections::HashMap;

/// Largest id a table accepts
///
/// Definition file ids are u16-scale in practice. Larger ids come from a
/// corrupt archive index and would force a huge allocation, so they are
/// dropped with a warning.
pub const MAX_DEFINITION_ID: u32 = 1 << 20;

/// A definition that knows the id it was decoded under
pub trait Identified {
    /// The id this definition occupies in its table
    fn id(&self) -> u32;
}

/// Dense table of definitions indexed by id
///
/// `len()` is always one past the largest present id, or zero when empty.
/// Slots that were never decoded hold `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTable<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for DefinitionTable<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Identified> DefinitionTable<T> {
    /// Build a table from decoded definitions
    ///
    /// Definitions with an id above [`MAX_DEFINITION_ID`] are left out.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let definitions: Vec<T> = definitions
            .into_iter()
            .filter(|definition| {
                let id = definition.id();
                if id > MAX_DEFINITION_ID {
                    tracing::warn!("definition id {} exceeds {}, skipping", id, MAX_DEFINITION_ID);
                    return false;
                }
                true
            })
            .collect();
        let Some(max_id) = definitions.iter().map(Identified::id).max() else {
            return Self::default();
        };

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None)
            .take(max_id as usize + 1)
            .collect();
        for definition in definitions {
            let index = definition.id() as usize;
            slots[index] = Some(definition);
        }

        Self { slots }
    }
}

impl<T: Identified + Clone> DefinitionTable<T> {
    /// Build a table from an id-keyed map
    pub fn from_map(definitions: &HashMap<u32, T>) -> Self {
        Self::from_definitions(definitions.values().cloned())
    }
}

impl<T> DefinitionTable<T> {
    /// Number of slots (largest present id + 1)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Definition stored under `id`, if it was decoded
    pub fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    /// Whether a definition is present under `id`
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Number of present definitions
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterate over present definitions in id order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    /// Raw slot view, absent entries included
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Consume the table into its slot vector
    pub fn into_slots(self) -> Vec<Option<T>> {
        self.slots
    }
}
