use crate::reader::{FieldReader, IndexReader, SegmentReader};
use crate::score::function::{FieldCollector, TermCollector, TermFacts};
use crate::score::order::PreparedOrder;

/// The field-level collectors of one query, one entry per scoring slot.
///
/// Slots with no field-wide statistics dependency hold `None` and cost
/// nothing per collected field.
pub struct FieldCollectors {
    collectors: Vec<Option<Box<dyn FieldCollector>>>,
    visited: bool,
}

impl FieldCollectors {
    pub fn new(order: &PreparedOrder) -> FieldCollectors {
        FieldCollectors {
            collectors: order
                .slots()
                .iter()
                .map(|slot| slot.function().field_collector())
                .collect(),
            visited: false,
        }
    }

    /// Invoked once per (segment, field) pair the filter visits, regardless
    /// of whether any term matched.
    pub fn collect(&mut self, segment: &dyn SegmentReader, field: &dyn FieldReader) {
        self.visited = true;
        for collector in self.collectors.iter_mut().flatten() {
            collector.collect(segment, field);
        }
    }

    /// True iff at least one (segment, field) pair was collected.
    pub fn visited(&self) -> bool {
        self.visited
    }

    /// Finalizes a field-only statistics unit: every slot is finished with
    /// its field facts and no term facts. Used when a visited field promoted
    /// no scored term at all.
    pub fn finish(&self, order: &PreparedOrder, unit: &mut [u8], index: &dyn IndexReader) {
        for (slot, collector) in order.slots().iter().zip(&self.collectors) {
            slot.function().finish(
                &mut unit[slot.stats_range()],
                index,
                collector.as_deref(),
                None,
            );
        }
    }

    pub(crate) fn slot(&self, slot: usize) -> Option<&dyn FieldCollector> {
        self.collectors[slot].as_deref()
    }

    /// True iff no slot keeps field-level statistics.
    pub fn is_empty(&self) -> bool {
        self.collectors.iter().all(Option::is_none)
    }
}

/// The term-level collectors of one query: one entry per (statistics unit,
/// scoring slot) pair, so each distinct scored term accumulates its own
/// facts independently.
pub struct TermCollectors {
    collectors: Vec<Option<Box<dyn TermCollector>>>,
    num_slots: usize,
}

impl TermCollectors {
    pub fn new(order: &PreparedOrder, terms: usize) -> TermCollectors {
        let num_slots = order.slots().len();
        let mut collectors = Vec::with_capacity(num_slots * terms);
        for _ in 0..terms {
            for slot in order.slots() {
                collectors.push(slot.function().term_collector());
            }
        }
        TermCollectors {
            collectors,
            num_slots,
        }
    }

    /// Feeds every slot the facts of one promoted (segment, term) record,
    /// accumulated into the statistics unit `term`.
    pub fn collect(
        &mut self,
        segment: &dyn SegmentReader,
        field: &dyn FieldReader,
        term: usize,
        facts: &TermFacts,
    ) {
        let base = term * self.num_slots;
        for collector in self.collectors[base..base + self.num_slots]
            .iter_mut()
            .flatten()
        {
            collector.collect(segment, field, facts);
        }
    }

    /// Finalizes the statistics unit `term`, writing each slot's region.
    /// Invoked exactly once per unit, after all segments were visited.
    pub fn finish(
        &self,
        order: &PreparedOrder,
        unit: &mut [u8],
        term: usize,
        field_collectors: &FieldCollectors,
        index: &dyn IndexReader,
    ) {
        let base = term * self.num_slots;
        for (slot_ord, slot) in order.slots().iter().enumerate() {
            slot.function().finish(
                &mut unit[slot.stats_range()],
                index,
                field_collectors.slot(slot_ord),
                self.collectors[base + slot_ord].as_deref(),
            );
        }
    }
}
