//! CardBatch entity - The ordered set of finished cards handed to the renderer

use serde::{Deserialize, Serialize};

use super::card::CardRecord;
use crate::DomainError;

/// Finished cards in generation order.
///
/// Insertion order is render order and grid placement order. Titles are not
/// required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBatch {
    records: Vec<CardRecord>,
}

impl CardBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished record. Records without an illustration are rejected.
    pub fn push(&mut self, record: CardRecord) -> Result<(), DomainError> {
        if !record.is_complete() {
            return Err(DomainError::constraint(format!(
                "card '{}' has no illustration and cannot be rendered",
                record.title
            )));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a CardBatch {
    type Item = &'a CardRecord;
    type IntoIter = std::slice::Iter<'a, CardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
