use std::sync::Arc;

use log::warn;

use crate::postings::Postings;
use crate::query::multiterm::MultiTermState;
use crate::query::scorer::{EmptyScorer, Scorer};
use crate::query::union::{ScoredStream, ScoredUnion};
use crate::reader::{SegmentId, SegmentReader, TermIterator};
use crate::score::{PreparedOrder, Stats};
use crate::states::StatesCache;

/// A prepared multi-term filter: the frozen outcome of the prepare walk,
/// ready to be executed lazily against any of its segments.
///
/// Execution is per segment and independent: a segment with no cached state
/// (or whose field vanished) yields an empty scorer rather than an error.
pub struct MultiTermQuery {
    field: String,
    order: Arc<PreparedOrder>,
    states: StatesCache<MultiTermState>,
    stats: Stats,
}

impl MultiTermQuery {
    pub(crate) fn new(
        field: String,
        order: Arc<PreparedOrder>,
        states: StatesCache<MultiTermState>,
        stats: Stats,
    ) -> MultiTermQuery {
        MultiTermQuery {
            field,
            order,
            states,
            stats,
        }
    }

    /// Name of the queried field.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn order(&self) -> &Arc<PreparedOrder> {
        &self.order
    }

    /// The query-wide statistics buffer shared by all segments.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The cached execution state of one segment, if it matched anything.
    pub fn state(&self, segment: SegmentId) -> Option<&MultiTermState> {
        self.states.find(segment)
    }

    /// Builds the posting union of one segment from its cached state.
    ///
    /// Every scored term binds one scorer per scoring slot against its
    /// statistics unit. A cookie that no longer reseats drops that one
    /// stream; the rest of the segment still executes.
    pub fn execute(&self, segment: &dyn SegmentReader) -> crate::Result<Box<dyn Scorer>> {
        let state = match self.states.find(segment.id()) {
            Some(state) => state,
            None => return Ok(Box::new(EmptyScorer)),
        };
        let field = match segment.field(&self.field) {
            Some(field) => field,
            None => return Ok(Box::new(EmptyScorer)),
        };
        let mut scored = Vec::with_capacity(state.scored_terms.len());
        for term in &state.scored_terms {
            let mut terms = field.iterator();
            match terms.seek_cookie(&term.cookie) {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        "stale term cookie on segment {:?}, dropping one scored stream",
                        segment.id()
                    );
                    continue;
                }
                Err(error) => {
                    warn!(
                        "failed to reseat term cookie on segment {:?}: {}",
                        segment.id(),
                        error
                    );
                    continue;
                }
            }
            let postings = terms.postings()?;
            let unit = self.stats.unit(term.stat_offset);
            let scorers = self
                .order
                .slots()
                .iter()
                .map(|slot| slot.function().scorer(&unit[slot.stats_range()], term.boost))
                .collect();
            scored.push(ScoredStream { postings, scorers });
        }
        let mut unscored: Vec<Box<dyn Postings>> = Vec::with_capacity(state.unscored_terms.len());
        for term in &state.unscored_terms {
            let mut terms = field.iterator();
            match terms.seek_cookie(&term.cookie) {
                Ok(true) => unscored.push(terms.postings()?),
                Ok(false) => {
                    warn!(
                        "stale term cookie on segment {:?}, dropping one stream",
                        segment.id()
                    );
                }
                Err(error) => {
                    warn!(
                        "failed to reseat term cookie on segment {:?}: {}",
                        segment.id(),
                        error
                    );
                }
            }
        }
        Ok(Box::new(ScoredUnion::new(
            self.order.clone(),
            scored,
            unscored,
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::MultiTermQuery;
    use crate::docset::{DocSet, TERMINATED};
    use crate::memory::MemSegment;
    use crate::query::multiterm::{MultiTermState, UnscoredTermState};
    use crate::reader::{SeekCookie, SegmentId, SegmentReader, TermIterator};
    use crate::score::{PreparedOrder, Stats};
    use crate::states::StatesCache;

    #[test]
    fn test_unknown_segment_yields_empty_scorer() {
        let query = MultiTermQuery::new(
            "f".to_string(),
            Arc::new(PreparedOrder::unordered()),
            StatesCache::new(0),
            Stats::empty(),
        );
        let segment = MemSegment::new(SegmentId::new(7), 1);
        let scorer = query.execute(&segment).unwrap();
        assert_eq!(scorer.doc(), TERMINATED);
    }

    #[test]
    fn test_stale_cookie_drops_only_that_stream() {
        let mut segment = MemSegment::new(SegmentId::new(0), 2);
        segment.add_term("f", b"a", &[(0, 1), (1, 1)]);
        let field = segment.field("f").unwrap();

        let mut good = field.iterator();
        assert!(good.next());
        let mut state = MultiTermState::default();
        state.unscored_terms.push(UnscoredTermState {
            cookie: good.cookie(),
        });
        state.unscored_terms.push(UnscoredTermState {
            // a payload no MemTermIterator ever produced
            cookie: SeekCookie::new(1234u64),
        });
        state.unscored_cost = 2;
        let mut states = StatesCache::new(1);
        *states.insert(segment.id()) = state;

        let query = MultiTermQuery::new(
            "f".to_string(),
            Arc::new(PreparedOrder::unordered()),
            states,
            Stats::empty(),
        );
        let mut scorer = query.execute(&segment).unwrap();
        assert_eq!(scorer.doc(), 0);
        assert_eq!(scorer.advance(), 1);
        assert_eq!(scorer.advance(), TERMINATED);
    }
}
