use std::cmp::Ordering;

use downcast_rs::{impl_downcast, Downcast};

use crate::reader::{FieldReader, IndexReader, SegmentReader};
use crate::DocId;

/// Maximum natural alignment a scoring slot may request.
pub const MAX_SLOT_ALIGN: usize = 16;

/// Size and alignment of one slot's region within a shared buffer.
///
/// `align` must be a power of two no greater than [`MAX_SLOT_ALIGN`];
/// [`crate::score::ScoringOrder::prepare`] rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferLayout {
    pub size: usize,
    pub align: usize,
}

impl BufferLayout {
    /// A zero-sized region. Slots with no statistics use this for their
    /// stats layout.
    pub fn empty() -> BufferLayout {
        BufferLayout { size: 0, align: 1 }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.align.is_power_of_two() && self.align <= MAX_SLOT_ALIGN
    }
}

/// Term-level facts observed while a filter walks a segment's terms.
#[derive(Clone, Copy, Debug)]
pub struct TermFacts<'a> {
    /// The bytes of the matched term.
    pub term: &'a [u8],
    /// Number of documents of the segment containing the term.
    pub doc_freq: u64,
}

/// Captures field-wide facts, once per (segment, field) pair a filter
/// visits, regardless of whether any term matched.
pub trait FieldCollector: Downcast + Send {
    fn collect(&mut self, segment: &dyn SegmentReader, field: &dyn FieldReader);
}
impl_downcast!(FieldCollector);

/// Captures term-level facts contributing to one distinct scored term's
/// statistics unit.
///
/// The same term promoted by several segments is collected once per
/// promoting segment into the same collector, so the accumulation must be
/// order-independent (sums, counts).
pub trait TermCollector: Downcast + Send {
    fn collect(&mut self, segment: &dyn SegmentReader, field: &dyn FieldReader, facts: &TermFacts);
}
impl_downcast!(TermCollector);

/// A configured scoring function, before it is tied to a query.
pub trait ScoreFunction: Send + Sync {
    /// Prepares the function for one query.
    ///
    /// Returning `None` disables the function: the prepared order skips it
    /// entirely and it occupies no buffer space.
    fn prepare(&self) -> Option<Box<dyn PreparedScoreFunction>>;
}

/// One prepared scoring function. Opaque to the execution core: the core
/// only moves bytes it never interprets between the regions this trait
/// describes.
pub trait PreparedScoreFunction: Send + Sync {
    /// Placement requirement within the per-document score buffer.
    fn score_layout(&self) -> BufferLayout;

    /// Placement requirement within the per-query statistics buffer.
    fn stats_layout(&self) -> BufferLayout {
        BufferLayout::empty()
    }

    /// A fresh field-level collector, or `None` when the function has no
    /// field-wide statistics dependency.
    fn field_collector(&self) -> Option<Box<dyn FieldCollector>> {
        None
    }

    /// A fresh term-level collector, or `None` when the function has no
    /// term-wise statistics dependency.
    fn term_collector(&self) -> Option<Box<dyn TermCollector>> {
        None
    }

    /// Folds the collected facts into `stats`, the function's own region of
    /// one statistics unit.
    ///
    /// Called exactly once per statistics unit, after every segment has been
    /// visited; this is the only point the statistics buffer is written.
    /// Must not fail: the order validated the configuration up front.
    fn finish(
        &self,
        stats: &mut [u8],
        index: &dyn IndexReader,
        field: Option<&dyn FieldCollector>,
        term: Option<&dyn TermCollector>,
    );

    /// Compares two score regions produced by this function.
    fn compare(&self, lhs: &[u8], rhs: &[u8]) -> Ordering;

    /// Folds the score regions in `srcs` into `dst` using the function's own
    /// combination rule, typically summation.
    ///
    /// Implementations handle the 0/1/2/N fan-in cases directly; semantics
    /// must be identical across fan-in sizes.
    fn merge(&self, dst: &mut [u8], srcs: &[&[u8]]);

    /// Binds a scorer to one term: `stats` is the term's statistics region
    /// (empty when the function keeps no statistics), `boost` the term's
    /// weight. The scorer is invoked once per matching document.
    fn scorer(&self, stats: &[u8], boost: f32) -> Box<dyn TermScoreFn>;
}

/// A scoring function bound to one term of one query, writing per-document
/// scores into its slot region of the score buffer.
pub trait TermScoreFn: Send {
    fn score(&mut self, doc: DocId, term_freq: u32, out: &mut [u8]);
}
