use std::sync::Arc;

use crate::docset::{DocSet, TERMINATED};
use crate::postings::Postings;
use crate::query::scorer::Scorer;
use crate::score::{PreparedOrder, TermScoreFn};
use crate::DocId;

/// One reseated posting stream of a scored term, with one bound scorer per
/// scoring slot, in slot order.
pub struct ScoredStream {
    pub postings: Box<dyn Postings>,
    pub scorers: Vec<Box<dyn TermScoreFn>>,
}

/// Union of the posting streams of one segment's matched terms.
///
/// Scored streams contribute to the per-document score buffer; unscored
/// streams contribute matching documents only. It doesn't do any horizon
/// precomputation, which suits the skip-heavy access pattern of multi-term
/// execution.
pub struct ScoredUnion {
    order: Arc<PreparedOrder>,
    scored: Vec<ScoredStream>,
    unscored: Vec<Box<dyn Postings>>,
    doc: DocId,
    // per-stream staging regions for the score buffers being merged
    staging: Vec<u8>,
    matched: Vec<usize>,
}

impl ScoredUnion {
    pub fn new(
        order: Arc<PreparedOrder>,
        mut scored: Vec<ScoredStream>,
        mut unscored: Vec<Box<dyn Postings>>,
    ) -> ScoredUnion {
        scored.retain(|stream| stream.postings.doc() != TERMINATED);
        unscored.retain(|postings| postings.doc() != TERMINATED);
        let staging = vec![0u8; scored.len() * order.score_size()];
        let mut union = ScoredUnion {
            order,
            scored,
            unscored,
            doc: 0,
            staging,
            matched: Vec::new(),
        };
        union.initialize_first_doc();
        union
    }

    fn initialize_first_doc(&mut self) {
        let mut next_doc = TERMINATED;
        for postings in self.streams() {
            next_doc = next_doc.min(postings.doc());
        }
        self.doc = next_doc;
    }

    fn streams(&self) -> impl Iterator<Item = &Box<dyn Postings>> {
        self.scored
            .iter()
            .map(|stream| &stream.postings)
            .chain(self.unscored.iter())
    }

    fn streams_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Postings>> {
        self.scored
            .iter_mut()
            .map(|stream| &mut stream.postings)
            .chain(self.unscored.iter_mut())
    }

    fn advance_to_next(&mut self) -> DocId {
        let doc = self.doc;
        let mut next_doc = TERMINATED;
        for postings in self.streams_mut() {
            if postings.doc() <= doc {
                postings.advance();
            }
            next_doc = next_doc.min(postings.doc());
        }
        self.doc = next_doc;
        self.doc
    }
}

impl DocSet for ScoredUnion {
    fn advance(&mut self) -> DocId {
        self.advance_to_next()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let mut next_doc = TERMINATED;
        for postings in self.streams_mut() {
            if postings.doc() < target {
                postings.seek(target);
            }
            next_doc = next_doc.min(postings.doc());
        }
        self.doc = next_doc;
        self.doc
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        self.streams()
            .map(|postings| postings.size_hint())
            .max()
            .unwrap_or(0u32)
    }
}

impl Scorer for ScoredUnion {
    fn score(&mut self, buf: &mut [u8]) {
        buf.fill(0);
        if self.order.is_empty() {
            return;
        }
        let size = self.order.score_size();
        self.matched.clear();
        for (ord, stream) in self.scored.iter_mut().enumerate() {
            if stream.postings.doc() != self.doc {
                continue;
            }
            let staging = &mut self.staging[ord * size..(ord + 1) * size];
            staging.fill(0);
            let term_freq = stream.postings.term_freq();
            for (slot, scorer) in self.order.slots().iter().zip(stream.scorers.iter_mut()) {
                scorer.score(self.doc, term_freq, &mut staging[slot.score_range()]);
            }
            self.matched.push(ord);
        }
        let srcs: Vec<&[u8]> = self
            .matched
            .iter()
            .map(|&ord| &self.staging[ord * size..(ord + 1) * size])
            .collect();
        self.order.merge(buf, &srcs);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ScoredStream, ScoredUnion};
    use crate::docset::{DocSet, TERMINATED};
    use crate::memory::MemPostings;
    use crate::postings::Postings;
    use crate::query::scorer::Scorer;
    use crate::score::{MatchCount, PreparedOrder, ScoringOrder};

    fn match_count_order() -> Arc<PreparedOrder> {
        let mut order = ScoringOrder::new();
        order.push(Box::new(MatchCount), false);
        Arc::new(order.prepare().unwrap())
    }

    fn stream(order: &PreparedOrder, docs: &[u32]) -> ScoredStream {
        let postings: Box<dyn Postings> =
            Box::new(MemPostings::from_docs(docs.iter().map(|&doc| (doc, 1)).collect()));
        let scorers = order
            .slots()
            .iter()
            .map(|slot| slot.function().scorer(&[], 1.0))
            .collect();
        ScoredStream { postings, scorers }
    }

    #[test]
    fn test_union_docs_and_counts() {
        let order = match_count_order();
        let scored = vec![stream(&order, &[0, 2, 4]), stream(&order, &[2, 3])];
        let unscored: Vec<Box<dyn Postings>> = vec![Box::new(MemPostings::from_docs(vec![(5, 1)]))];
        let mut union = ScoredUnion::new(order.clone(), scored, unscored);
        let mut counts = Vec::new();
        let mut buf = vec![0u8; order.score_size()];
        let mut doc = union.doc();
        while doc != TERMINATED {
            union.score(&mut buf);
            counts.push((doc, u32::from_le_bytes(buf[..4].try_into().unwrap())));
            doc = union.advance();
        }
        // doc 2 matches both scored streams; doc 5 is unscored only
        assert_eq!(counts, vec![(0, 1), (2, 2), (3, 1), (4, 1), (5, 0)]);
    }

    #[test]
    fn test_union_seek() {
        let order = match_count_order();
        let scored = vec![stream(&order, &[0, 2, 4, 9]), stream(&order, &[3, 9])];
        let mut union = ScoredUnion::new(order, scored, Vec::new());
        assert_eq!(union.seek(3), 3);
        assert_eq!(union.advance(), 4);
        assert_eq!(union.seek(5), 9);
        assert_eq!(union.advance(), TERMINATED);
    }

    #[test]
    fn test_union_of_nothing_is_terminated() {
        let order = match_count_order();
        let union = ScoredUnion::new(order, Vec::new(), Vec::new());
        assert_eq!(union.doc(), TERMINATED);
    }
}
