//! Assigning layout slots to records by rank.

use std::cmp::Ordering;

use super::{LayoutError, LayoutResult, LayoutTarget};

/// Maps each record to the layout slot it occupies.
///
/// Slot 0 is the first target a strategy emits (the top-left table cell, the
/// bottom of the helix), so the best-ranked record lands there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOrdering {
    slots: Vec<usize>,
}

impl RecordOrdering {
    /// Record `i` takes slot `i`.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            slots: (0..len).collect(),
        }
    }

    /// Rank records by descending score. Ties keep input order and NaN scores
    /// rank last.
    #[must_use]
    pub fn by_descending_score(scores: &[f64]) -> Self {
        let mut by_rank: Vec<usize> = (0..scores.len()).collect();
        by_rank.sort_by(|&a, &b| compare_descending(scores[a], scores[b]));

        let mut slots = vec![0; scores.len()];
        for (slot, record) in by_rank.into_iter().enumerate() {
            slots[record] = slot;
        }
        Self { slots }
    }

    /// Explicit `slots[record]`; must be a permutation of `0..slots.len()`.
    pub fn from_slots(slots: Vec<usize>) -> LayoutResult<Self> {
        let mut taken = vec![false; slots.len()];
        for (record, &slot) in slots.iter().enumerate() {
            match taken.get_mut(slot) {
                None => {
                    return Err(LayoutError::InvalidOrdering(format!(
                        "record {record} has slot {slot}, but only {} slots exist",
                        slots.len()
                    )));
                }
                Some(true) => {
                    return Err(LayoutError::InvalidOrdering(format!(
                        "slot {slot} is assigned more than once"
                    )));
                }
                Some(free) => *free = true,
            }
        }
        Ok(Self { slots })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slot(&self, record: usize) -> Option<usize> {
        self.slots.get(record).copied()
    }

    /// One-based rank of a record.
    #[must_use]
    pub fn rank(&self, record: usize) -> Option<usize> {
        self.slot(record).map(|slot| slot + 1)
    }

    /// Records listed from slot 0 upwards.
    #[must_use]
    pub fn records_by_slot(&self) -> Vec<usize> {
        let mut records = vec![0; self.slots.len()];
        for (record, &slot) in self.slots.iter().enumerate() {
            records[slot] = record;
        }
        records
    }

    /// Reindex `targets` (indexed by slot) so entry `i` belongs to record `i`.
    pub fn apply(&self, targets: &[LayoutTarget]) -> LayoutResult<Vec<LayoutTarget>> {
        if targets.len() != self.slots.len() {
            return Err(LayoutError::OrderingLength {
                expected: targets.len(),
                actual: self.slots.len(),
            });
        }
        Ok(self.slots.iter().map(|&slot| targets[slot]).collect())
    }
}

fn compare_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
