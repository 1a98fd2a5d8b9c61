use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::reader::IndexReader;
use crate::score::function::{
    BufferLayout, FieldCollector, PreparedScoreFunction, ScoreFunction, TermCollector,
    TermScoreFn,
};
use crate::DocId;

/// Counts how many scored terms matched each document.
///
/// Keeps no statistics at all, so it exercises the no-op collector path:
/// aggregation cost for this slot is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCount;

impl ScoreFunction for MatchCount {
    fn prepare(&self) -> Option<Box<dyn PreparedScoreFunction>> {
        Some(Box::new(MatchCount))
    }
}

fn read_count(buf: &[u8]) -> u32 {
    u32::from_le_bytes(buf[..4].try_into().expect("score slot"))
}

impl PreparedScoreFunction for MatchCount {
    fn score_layout(&self) -> BufferLayout {
        BufferLayout { size: 4, align: 4 }
    }

    fn finish(
        &self,
        _stats: &mut [u8],
        _index: &dyn IndexReader,
        _field: Option<&dyn FieldCollector>,
        _term: Option<&dyn TermCollector>,
    ) {
    }

    fn compare(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        read_count(lhs).cmp(&read_count(rhs))
    }

    fn merge(&self, dst: &mut [u8], srcs: &[&[u8]]) {
        let merged = match srcs {
            [] => return,
            [single] => read_count(single),
            [first, second] => read_count(first) + read_count(second),
            _ => srcs.iter().map(|src| read_count(src)).sum(),
        };
        dst.copy_from_slice(&merged.to_le_bytes());
    }

    fn scorer(&self, _stats: &[u8], _boost: f32) -> Box<dyn TermScoreFn> {
        struct One;
        impl TermScoreFn for One {
            fn score(&mut self, _doc: DocId, _term_freq: u32, out: &mut [u8]) {
                out.copy_from_slice(&1u32.to_le_bytes());
            }
        }
        Box::new(One)
    }
}

#[cfg(test)]
mod tests {
    use super::MatchCount;
    use crate::score::function::PreparedScoreFunction;

    #[test]
    fn test_no_statistics_dependency() {
        let function = MatchCount;
        assert!(function.field_collector().is_none());
        assert!(function.term_collector().is_none());
        assert_eq!(function.stats_layout().size, 0);
    }

    #[test]
    fn test_merge_counts() {
        let function = MatchCount;
        let one = 1u32.to_le_bytes();
        let mut dst = [0u8; 4];
        function.merge(&mut dst, &[&one, &one]);
        assert_eq!(u32::from_le_bytes(dst), 2);
    }
}
