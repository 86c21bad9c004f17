//! Stable identifiers for unique combinations of peptide sequence and modifications

use std::collections::HashMap;

/// The character separating the sequence and modification description in the registry keys
const KEY_SEPARATOR: char = '_';

/// Assigns a stable integer identifier to every unique combination of a clean sequence and its
/// modification description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniqueSequenceRegistry {
    ids: HashMap<String, usize>,
    next_id: usize,
}

impl Default for UniqueSequenceRegistry {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            next_id: 1,
        }
    }
}

impl UniqueSequenceRegistry {
    /// Create an empty registry that starts numbering at 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all sequences and restart the numbering at the given identifier
    pub fn clear(&mut self, starting_id: usize) {
        self.ids.clear();
        self.next_id = starting_id;
    }

    /// Get the identifier for this sequence and modification description, a new identifier is
    /// assigned if this combination was not seen before. Returns the identifier and if the
    /// combination was already present.
    pub fn get_or_assign_id(&mut self, sequence: &str, modification_description: &str) -> (usize, bool) {
        let key = format!("{sequence}{KEY_SEPARATOR}{modification_description}");
        if let Some(id) = self.ids.get(&key) {
            (*id, true)
        } else {
            let id = self.next_id;
            self.ids.insert(key, id);
            self.next_id += 1;
            (id, false)
        }
    }

    /// The number of unique sequences
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// If no sequences are registered
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The identifier that will be assigned to the next new combination
    pub const fn next_id(&self) -> usize {
        self.next_id
    }
}
