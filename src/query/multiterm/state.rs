use crate::reader::SeekCookie;

/// One scored term of one segment: the dictionary position to reseat at
/// execute time, the byte offset of the term's statistics unit, and the
/// term's individual weight.
#[derive(Debug)]
pub struct ScoredTermState {
    pub cookie: SeekCookie,
    pub stat_offset: usize,
    pub boost: f32,
}

/// A matched term that still contributes matching documents but is not
/// individually weighted.
#[derive(Debug)]
pub struct UnscoredTermState {
    pub cookie: SeekCookie,
}

/// Per-(query, segment) execution state of a multi-term filter.
///
/// Created at most once per segment during prepare, immutable thereafter,
/// destroyed with the query. The cost estimates are document-frequency sums
/// used by callers to pick a downstream iterator strategy.
#[derive(Debug, Default)]
pub struct MultiTermState {
    pub scored_terms: Vec<ScoredTermState>,
    pub unscored_terms: Vec<UnscoredTermState>,
    pub scored_cost: u64,
    pub unscored_cost: u64,
}

impl MultiTermState {
    /// True iff no term of the segment matched.
    pub fn is_empty(&self) -> bool {
        self.scored_terms.is_empty() && self.unscored_terms.is_empty()
    }

    /// Combined cost estimate of all posting streams of the segment.
    pub fn cost(&self) -> u64 {
        self.scored_cost + self.unscored_cost
    }
}
