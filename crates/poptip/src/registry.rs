//! Registry of every live tooltip record, across all instances.
//!
//! Insertion order is the only ordering contract: scans visit records in the
//! order they were created, and a record recreated by a settings patch takes
//! the slot of the record it replaces.

use crate::engine::{InstanceId, PopperId};
use crate::record::TooltipRecord;
use poptip_core::ElementId;

/// Ordered collection of tooltip records.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<TooltipRecord>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: TooltipRecord) {
        tracing::trace!(id = record.id, popper = ?record.popper_id(), "registered tooltip");
        self.records.push(record);
    }

    /// Insert a record at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, record: TooltipRecord) {
        let index = index.min(self.records.len());
        tracing::trace!(id = record.id, index, "registered tooltip in place");
        self.records.insert(index, record);
    }

    /// First record matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&TooltipRecord) -> bool) -> Option<&TooltipRecord> {
        self.records.iter().find(|r| predicate(r))
    }

    /// Index of the first record matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&TooltipRecord) -> bool) -> Option<usize> {
        self.records.iter().position(predicate)
    }

    /// Remove and return the record at `index`.
    pub fn remove(&mut self, index: usize) -> Option<TooltipRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    /// Record owning `popper`.
    #[must_use]
    pub fn by_popper(&self, popper: PopperId) -> Option<&TooltipRecord> {
        self.find(|r| r.popper_id() == popper)
    }

    /// Mutable record owning `popper`.
    pub fn by_popper_mut(&mut self, popper: PopperId) -> Option<&mut TooltipRecord> {
        self.records.iter_mut().find(|r| r.popper_id() == popper)
    }

    /// Record attached to `reference`.
    #[must_use]
    pub fn by_reference(&self, reference: ElementId) -> Option<&TooltipRecord> {
        self.find(|r| r.reference == reference)
    }

    /// Records owned by `instance`, in registry order.
    pub fn owned_by(&self, instance: InstanceId) -> impl Iterator<Item = &TooltipRecord> {
        self.records.iter().filter(move |r| r.owner == instance)
    }

    /// All records in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &TooltipRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
