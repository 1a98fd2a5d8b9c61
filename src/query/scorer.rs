use crate::docset::{DocSet, TERMINATED};
use crate::DocId;

/// Scored streams of documents.
///
/// `score` fills a caller-allocated score buffer of
/// [`crate::score::PreparedOrder::score_size`] bytes for the current
/// document. Score buffers are call-local and never shared.
pub trait Scorer: DocSet {
    /// Writes the score of the document the docset is currently positioned
    /// on into `buf`.
    fn score(&mut self, buf: &mut [u8]);
}

/// `EmptyScorer` is a `Scorer` that matches no document.
///
/// It is useful for queries (or segments) that match no document at all.
pub struct EmptyScorer;

impl DocSet for EmptyScorer {
    fn advance(&mut self) -> DocId {
        TERMINATED
    }

    fn doc(&self) -> DocId {
        TERMINATED
    }

    fn size_hint(&self) -> u32 {
        0
    }
}

impl Scorer for EmptyScorer {
    fn score(&mut self, _buf: &mut [u8]) {}
}

#[cfg(test)]
mod tests {
    use super::EmptyScorer;
    use crate::docset::{DocSet, TERMINATED};

    #[test]
    fn test_empty_scorer_is_terminated() {
        let mut scorer = EmptyScorer;
        assert_eq!(scorer.doc(), TERMINATED);
        assert_eq!(scorer.advance(), TERMINATED);
        assert_eq!(scorer.advance(), TERMINATED);
    }
}
