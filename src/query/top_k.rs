use std::cmp::Ordering;

use fnv::FnvHashMap;

use crate::query::multiterm::{MultiTermState, ScoredTermState, UnscoredTermState};
use crate::reader::{IndexReader, SeekCookie, SegmentId};
use crate::score::{FieldCollectors, PreparedOrder, Stats, StatsBuilder, TermCollectors, TermFacts};

/// One matched term observed by the selector, captured from the live term
/// iterator while a filter walks a segment.
pub struct TermCandidate<K> {
    /// Comparison key deciding promotion; the K largest keys win.
    pub key: K,
    pub term: Vec<u8>,
    pub doc_freq: u64,
    pub cookie: SeekCookie,
    pub boost: f32,
}

struct Promoted<K> {
    key: K,
    term: Vec<u8>,
    doc_freq: u64,
    cookie: SeekCookie,
    boost: f32,
    cursor: u32,
}

struct Cursor {
    segment: SegmentId,
    ord: usize,
    state: MultiTermState,
}

fn demote(state: &mut MultiTermState, cookie: SeekCookie, doc_freq: u64) {
    state.unscored_terms.push(UnscoredTermState { cookie });
    state.unscored_cost += doc_freq;
}

/// Bounded-memory top-K selection over a live stream of matched terms.
///
/// At most `limit` promoted records are buffered at any time. The heap
/// orders lightweight indices into the promoted vector, so heap operations
/// never move the record payloads. Everything below the bar is demoted to
/// the owning segment's unscored list as the stream goes by.
///
/// `limit == 0` disables scoring entirely: every candidate is demoted
/// directly, with no per-term selection or statistics cost.
pub struct BoundedTopKSelector<K> {
    limit: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering + Send>,
    promoted: Vec<Promoted<K>>,
    heap: Vec<u32>,
    cursors: Vec<Cursor>,
}

impl<K: Ord + 'static> BoundedTopKSelector<K> {
    /// A selector ordered by the key's own ordering.
    pub fn by_key(limit: usize) -> BoundedTopKSelector<K> {
        BoundedTopKSelector::new(limit, K::cmp)
    }
}

impl<K> BoundedTopKSelector<K> {
    pub fn new(
        limit: usize,
        comparer: impl Fn(&K, &K) -> Ordering + Send + 'static,
    ) -> BoundedTopKSelector<K> {
        BoundedTopKSelector {
            limit,
            cmp: Box::new(comparer),
            promoted: Vec::with_capacity(limit),
            heap: Vec::with_capacity(limit),
            cursors: Vec::new(),
        }
    }

    /// Begins a segment pass: every subsequent [`collect`](Self::collect)
    /// call is attributed to this segment until the next `prepare`.
    pub fn prepare(&mut self, segment_ord: usize, segment: SegmentId) {
        self.cursors.push(Cursor {
            segment,
            ord: segment_ord,
            state: MultiTermState::default(),
        });
    }

    /// Observes one candidate term of the current segment.
    pub fn collect(&mut self, candidate: TermCandidate<K>) {
        assert!(
            !self.cursors.is_empty(),
            "BoundedTopKSelector::prepare must precede collect"
        );
        let cursor = (self.cursors.len() - 1) as u32;
        if self.limit == 0 {
            let state = &mut self.cursors[cursor as usize].state;
            demote(state, candidate.cookie, candidate.doc_freq);
            return;
        }
        let TermCandidate {
            key,
            term,
            doc_freq,
            cookie,
            boost,
        } = candidate;
        let record = Promoted {
            key,
            term,
            doc_freq,
            cookie,
            boost,
            cursor,
        };
        if self.promoted.len() < self.limit {
            let index = self.promoted.len() as u32;
            self.promoted.push(record);
            self.heap.push(index);
            self.sift_up(self.heap.len() - 1);
            return;
        }
        let min = self.heap[0] as usize;
        if (self.cmp)(&record.key, &self.promoted[min].key) != Ordering::Greater {
            // Not greater than the current minimum, ties included: the
            // candidate is demoted and earlier-seen terms win.
            let state = &mut self.cursors[record.cursor as usize].state;
            demote(state, record.cookie, record.doc_freq);
            return;
        }
        let evicted = std::mem::replace(&mut self.promoted[min], record);
        let state = &mut self.cursors[evicted.cursor as usize].state;
        demote(state, evicted.cookie, evicted.doc_freq);
        // the root index now names the new record; restore the heap
        self.sift_down(0);
    }

    /// Finalizes the selection: deduplicates promoted records by term value,
    /// accumulates and finalizes one statistics unit per distinct term, and
    /// drains the per-segment state contributions.
    pub fn score(
        mut self,
        index: &dyn IndexReader,
        order: &PreparedOrder,
        field_name: &str,
        field_collectors: &FieldCollectors,
    ) -> (Stats, Vec<(SegmentId, MultiTermState)>) {
        let mut stat_units: FnvHashMap<Vec<u8>, usize> = FnvHashMap::default();
        for record in &self.promoted {
            let next = stat_units.len();
            stat_units.entry(record.term.clone()).or_insert(next);
        }
        let distinct = stat_units.len();
        let stride = order.stats_size();
        let mut collectors = TermCollectors::new(order, distinct);
        for record in std::mem::take(&mut self.promoted) {
            let unit = stat_units[&record.term];
            let cursor = &mut self.cursors[record.cursor as usize];
            let segment = index.segment(cursor.ord);
            if let Some(field) = segment.field(field_name) {
                let facts = TermFacts {
                    term: &record.term,
                    doc_freq: record.doc_freq,
                };
                collectors.collect(segment, field, unit, &facts);
            }
            cursor.state.scored_terms.push(ScoredTermState {
                cookie: record.cookie,
                stat_offset: unit * stride,
                boost: record.boost,
            });
            cursor.state.scored_cost += record.doc_freq;
        }
        let stats = if distinct > 0 {
            let mut builder = StatsBuilder::new(order, distinct);
            for unit in 0..distinct {
                collectors.finish(order, builder.unit_mut(unit), unit, field_collectors, index);
            }
            builder.freeze()
        } else if self.limit > 0 && field_collectors.visited() && !field_collectors.is_empty() {
            // fields were visited but no term was promoted: field-wide facts
            // still get their unit
            let mut builder = StatsBuilder::new(order, 1);
            field_collectors.finish(order, builder.unit_mut(0), index);
            builder.freeze()
        } else {
            Stats::empty()
        };
        let contributions = self
            .cursors
            .into_iter()
            .filter(|cursor| !cursor.state.is_empty())
            .map(|cursor| (cursor.segment, cursor.state))
            .collect();
        (stats, contributions)
    }

    fn key_less(&self, lhs: u32, rhs: u32) -> bool {
        (self.cmp)(
            &self.promoted[lhs as usize].key,
            &self.promoted[rhs as usize].key,
        ) == Ordering::Less
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.key_less(self.heap[pos], self.heap[parent]) {
                self.heap.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = 2 * pos + 1;
            if left >= self.heap.len() {
                break;
            }
            let mut child = left;
            let right = left + 1;
            if right < self.heap.len() && self.key_less(self.heap[right], self.heap[left]) {
                child = right;
            }
            if self.key_less(self.heap[child], self.heap[pos]) {
                self.heap.swap(child, pos);
                pos = child;
            } else {
                break;
            }
        }
    }
}
