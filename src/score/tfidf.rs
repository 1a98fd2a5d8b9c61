use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::reader::{FieldReader, IndexReader, SegmentReader};
use crate::score::function::{
    BufferLayout, FieldCollector, PreparedScoreFunction, ScoreFunction, TermCollector,
    TermFacts, TermScoreFn,
};
use crate::{DocId, Score};

/// TF-IDF scoring function.
///
/// Statistics kept per scored term: the term's document frequency and the
/// number of documents containing the field, both summed over every segment
/// that promoted the term. The per-document score is
/// `idf * boost * sqrt(term_freq)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfIdf {
    /// When false, the within-document term frequency is ignored and every
    /// matching document scores the plain term weight.
    pub with_freq: bool,
}

impl Default for TfIdf {
    fn default() -> TfIdf {
        TfIdf { with_freq: true }
    }
}

fn idf(doc_freq: u64, doc_count: u64) -> Score {
    debug_assert!(doc_count >= doc_freq, "{} >= {}", doc_count, doc_freq);
    let x = ((doc_count.saturating_sub(doc_freq)) as Score + 0.5) / (doc_freq as Score + 0.5);
    (1.0 + x).ln()
}

impl ScoreFunction for TfIdf {
    fn prepare(&self) -> Option<Box<dyn PreparedScoreFunction>> {
        Some(Box::new(*self))
    }
}

#[derive(Default)]
struct TfIdfFieldCollector {
    docs_with_field: u64,
}

impl FieldCollector for TfIdfFieldCollector {
    fn collect(&mut self, _segment: &dyn SegmentReader, field: &dyn FieldReader) {
        self.docs_with_field += field.docs_with_field();
    }
}

#[derive(Default)]
struct TfIdfTermCollector {
    doc_freq: u64,
}

impl TermCollector for TfIdfTermCollector {
    fn collect(
        &mut self,
        _segment: &dyn SegmentReader,
        _field: &dyn FieldReader,
        facts: &TermFacts,
    ) {
        self.doc_freq += facts.doc_freq;
    }
}

const DOC_FREQ_RANGE: std::ops::Range<usize> = 0..8;
const DOC_COUNT_RANGE: std::ops::Range<usize> = 8..16;

impl PreparedScoreFunction for TfIdf {
    fn score_layout(&self) -> BufferLayout {
        BufferLayout { size: 4, align: 4 }
    }

    fn stats_layout(&self) -> BufferLayout {
        BufferLayout { size: 16, align: 8 }
    }

    fn field_collector(&self) -> Option<Box<dyn FieldCollector>> {
        Some(Box::new(TfIdfFieldCollector::default()))
    }

    fn term_collector(&self) -> Option<Box<dyn TermCollector>> {
        Some(Box::new(TfIdfTermCollector::default()))
    }

    fn finish(
        &self,
        stats: &mut [u8],
        index: &dyn IndexReader,
        field: Option<&dyn FieldCollector>,
        term: Option<&dyn TermCollector>,
    ) {
        let doc_freq = term
            .and_then(|collector| collector.downcast_ref::<TfIdfTermCollector>())
            .map(|collector| collector.doc_freq)
            .unwrap_or(0);
        let doc_count = field
            .and_then(|collector| collector.downcast_ref::<TfIdfFieldCollector>())
            .map(|collector| collector.docs_with_field)
            .unwrap_or_else(|| index.num_docs());
        stats[DOC_FREQ_RANGE].copy_from_slice(&doc_freq.to_le_bytes());
        stats[DOC_COUNT_RANGE].copy_from_slice(&doc_count.to_le_bytes());
    }

    fn compare(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        read_score(lhs).total_cmp(&read_score(rhs))
    }

    fn merge(&self, dst: &mut [u8], srcs: &[&[u8]]) {
        let merged = match srcs {
            [] => return,
            [single] => read_score(single),
            [first, second] => read_score(first) + read_score(second),
            _ => srcs.iter().map(|src| read_score(src)).sum(),
        };
        dst.copy_from_slice(&merged.to_le_bytes());
    }

    fn scorer(&self, stats: &[u8], boost: f32) -> Box<dyn TermScoreFn> {
        let doc_freq = u64::from_le_bytes(stats[DOC_FREQ_RANGE].try_into().expect("stats unit"));
        let doc_count = u64::from_le_bytes(stats[DOC_COUNT_RANGE].try_into().expect("stats unit"));
        Box::new(TfIdfScorer {
            weight: idf(doc_freq, doc_count.max(doc_freq)) * boost,
            with_freq: self.with_freq,
        })
    }
}

fn read_score(buf: &[u8]) -> Score {
    Score::from_le_bytes(buf[..4].try_into().expect("score slot"))
}

struct TfIdfScorer {
    weight: Score,
    with_freq: bool,
}

impl TermScoreFn for TfIdfScorer {
    fn score(&mut self, _doc: DocId, term_freq: u32, out: &mut [u8]) {
        let score = if self.with_freq {
            self.weight * (term_freq as Score).sqrt()
        } else {
            self.weight
        };
        out.copy_from_slice(&score.to_le_bytes());
    }
}
