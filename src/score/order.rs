use std::cmp::Ordering;
use std::ops::Range;

use crate::score::function::{BufferLayout, PreparedScoreFunction, ScoreFunction};
use crate::ColumbiteError;

pub(crate) fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// One scoring function with its placement within the score and statistics
/// buffers. Immutable once the order is prepared.
pub struct ScoreSlot {
    function: Box<dyn PreparedScoreFunction>,
    reverse: bool,
    score_offset: usize,
    score_layout: BufferLayout,
    stats_offset: usize,
    stats_layout: BufferLayout,
}

impl ScoreSlot {
    /// The prepared scoring function occupying the slot.
    pub fn function(&self) -> &dyn PreparedScoreFunction {
        &*self.function
    }

    /// Whether ascending/descending comparison is inverted for this slot.
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// The slot's region within a per-document score buffer.
    pub fn score_range(&self) -> Range<usize> {
        self.score_offset..self.score_offset + self.score_layout.size
    }

    /// The slot's region within one statistics unit.
    pub fn stats_range(&self) -> Range<usize> {
        self.stats_offset..self.stats_offset + self.stats_layout.size
    }
}

/// User-specified ordered sequence of scoring functions, not yet laid out.
#[derive(Default)]
pub struct ScoringOrder {
    entries: Vec<(Box<dyn ScoreFunction>, bool)>,
}

impl ScoringOrder {
    pub fn new() -> ScoringOrder {
        ScoringOrder::default()
    }

    /// Appends a scoring function. `reverse` inverts the sense of "less"
    /// for this slot's comparisons only.
    pub fn push(&mut self, function: Box<dyn ScoreFunction>, reverse: bool) {
        self.entries.push((function, reverse));
    }

    /// Lays out the slots and freezes the order.
    ///
    /// Functions whose `prepare` yields nothing are skipped. A slot
    /// reporting an impossible layout is a configuration error and aborts
    /// query compilation.
    pub fn prepare(self) -> crate::Result<PreparedOrder> {
        let mut slots: Vec<ScoreSlot> = Vec::with_capacity(self.entries.len());
        let mut score_size = 0usize;
        let mut stats_size = 0usize;
        let mut max_score_align = 1usize;
        let mut max_stats_align = 1usize;
        for (function, reverse) in self.entries {
            let function = match function.prepare() {
                Some(prepared) => prepared,
                None => continue,
            };
            let score_layout = function.score_layout();
            let stats_layout = function.stats_layout();
            for layout in [&score_layout, &stats_layout] {
                if !layout.is_valid() {
                    return Err(ColumbiteError::InvalidArgument(format!(
                        "scoring slot {} requested alignment {}, expected a power of two <= {}",
                        slots.len(),
                        layout.align,
                        crate::score::MAX_SLOT_ALIGN,
                    )));
                }
            }
            score_size = align_up(score_size, score_layout.align);
            let score_offset = score_size;
            score_size += align_up(score_layout.size, score_layout.align);
            max_score_align = max_score_align.max(score_layout.align);

            stats_size = align_up(stats_size, stats_layout.align);
            let stats_offset = stats_size;
            stats_size += align_up(stats_layout.size, stats_layout.align);
            max_stats_align = max_stats_align.max(stats_layout.align);

            slots.push(ScoreSlot {
                function,
                reverse,
                score_offset,
                score_layout,
                stats_offset,
                stats_layout,
            });
        }
        Ok(PreparedOrder {
            slots,
            score_size: align_up(score_size, max_score_align),
            stats_size: align_up(stats_size, max_stats_align),
        })
    }
}

/// The frozen scoring order of one query: slot list plus the two buffer
/// layouts every segment shares. Read-only after prepare, safe to share
/// across segment-parallel execution.
pub struct PreparedOrder {
    slots: Vec<ScoreSlot>,
    score_size: usize,
    stats_size: usize,
}

impl PreparedOrder {
    /// An order with no slot at all; scoring is disabled.
    pub fn unordered() -> PreparedOrder {
        PreparedOrder {
            slots: Vec::new(),
            score_size: 0,
            stats_size: 0,
        }
    }

    /// The slots, in user order.
    pub fn slots(&self) -> &[ScoreSlot] {
        &self.slots
    }

    /// True iff no scoring function survived `prepare`.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Size in bytes of one per-document score buffer.
    pub fn score_size(&self) -> usize {
        self.score_size
    }

    /// Size in bytes of one statistics unit.
    pub fn stats_size(&self) -> usize {
        self.stats_size
    }

    /// Lexicographic slot-by-slot comparison of two score buffers.
    ///
    /// A present buffer is always less than a missing one; a missing buffer
    /// never precedes anything. The first slot where the buffers differ
    /// decides, with the slot's reverse flag inverting that decision only.
    pub fn less(&self, lhs: Option<&[u8]>, rhs: Option<&[u8]>) -> bool {
        let (lhs, rhs) = match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            (Some(_), None) => return true,
            (None, _) => return false,
        };
        for slot in &self.slots {
            let range = slot.score_range();
            let ordering = slot.function.compare(&lhs[range.clone()], &rhs[range]);
            let ordering = if slot.reverse {
                ordering.reverse()
            } else {
                ordering
            };
            match ordering {
                Ordering::Less => return true,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
        false
    }

    /// Folds the per-term score buffers in `srcs` into `dst`, slot by slot.
    pub fn merge(&self, dst: &mut [u8], srcs: &[&[u8]]) {
        debug_assert_eq!(dst.len(), self.score_size);
        match srcs {
            [] => {}
            [single] => dst.copy_from_slice(single),
            _ => {
                let mut slot_srcs: Vec<&[u8]> = Vec::with_capacity(srcs.len());
                for slot in &self.slots {
                    let range = slot.score_range();
                    slot_srcs.clear();
                    slot_srcs.extend(srcs.iter().map(|src| &src[range.clone()]));
                    slot.function.merge(&mut dst[range], &slot_srcs);
                }
            }
        }
    }
}
