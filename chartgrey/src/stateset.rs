use crate::items::{ChartEntry, EarleyItem, Reason};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Index;
use std::slice;

/// Insertion ordered entries of a chart position, unique on their EarleyItem.
/// An entry is never replaced so its index and Reason stay stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateSet {
    order: Vec<ChartEntry>,
    #[serde(skip)]
    dedup: HashMap<EarleyItem, usize>,
}

impl StateSet {
    pub fn new() -> StateSet {
        StateSet::default()
    }

    /// Append `item` unless already present. Returns the index of a new entry.
    pub fn push(&mut self, item: EarleyItem, reason: Reason) -> Option<usize> {
        if self.dedup.contains_key(&item) {
            return None;
        }
        let idx = self.order.len();
        self.order.push(ChartEntry { item, reason });
        self.dedup.insert(item, idx);
        Some(idx)
    }

    pub fn position(&self, item: &EarleyItem) -> Option<usize> {
        self.dedup.get(item).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ChartEntry> {
        self.order.get(idx)
    }

    pub fn iter(&self) -> slice::Iter<'_, ChartEntry> {
        self.order.iter()
    }
}

impl Index<usize> for StateSet {
    type Output = ChartEntry;
    fn index(&self, idx: usize) -> &ChartEntry {
        self.order.index(idx)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a ChartEntry;
    type IntoIter = slice::Iter<'a, ChartEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
