use std::sync::Arc;

use columbite::memory::{MemIndex, MemSegment};
use columbite::query::{prepare_multiterm, MultiTermQuery, PrefixMatcher, Scorer, TermSetMatcher};
use columbite::reader::SegmentId;
use columbite::score::{PreparedOrder, ScoringOrder, TfIdf};
use columbite::{DocSet, IndexReader, Score, TERMINATED};

fn tfidf_order() -> Arc<PreparedOrder> {
    let mut order = ScoringOrder::new();
    order.push(Box::new(TfIdf::default()), false);
    Arc::new(order.prepare().unwrap())
}

fn docs(range: std::ops::Range<u32>) -> Vec<(u32, u32)> {
    range.map(|doc| (doc, 1)).collect()
}

/// Three segments, each holding one of the terms a (df=10), b (df=7) and
/// c (df=3) in field "f".
fn three_segment_index() -> MemIndex {
    let mut index = MemIndex::new();
    let mut seg = MemSegment::new(SegmentId::new(0), 10);
    seg.add_term("f", b"a", &docs(0..10));
    index.add_segment(seg);
    let mut seg = MemSegment::new(SegmentId::new(1), 7);
    seg.add_term("f", b"b", &docs(0..7));
    index.add_segment(seg);
    let mut seg = MemSegment::new(SegmentId::new(2), 3);
    seg.add_term("f", b"c", &docs(0..3));
    index.add_segment(seg);
    index
}

fn prepare_abc(index: &MemIndex, limit: usize) -> MultiTermQuery {
    let matcher = TermSetMatcher::new(
        "f",
        vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()],
    );
    prepare_multiterm(index, tfidf_order(), limit, &matcher).unwrap()
}

#[test]
fn test_top_two_terms_are_scored() {
    let index = three_segment_index();
    let query = prepare_abc(&index, 2);
    // a and b promoted, one statistics unit each
    assert_eq!(query.stats().num_units(), 2);

    let state = query.state(SegmentId::new(0)).unwrap();
    assert_eq!(state.scored_terms.len(), 1);
    assert!(state.unscored_terms.is_empty());
    assert_eq!(state.scored_cost, 10);

    let state = query.state(SegmentId::new(1)).unwrap();
    assert_eq!(state.scored_terms.len(), 1);
    assert_eq!(state.scored_cost, 7);

    // c fell below the bar
    let state = query.state(SegmentId::new(2)).unwrap();
    assert!(state.scored_terms.is_empty());
    assert_eq!(state.unscored_terms.len(), 1);
    assert_eq!(state.unscored_cost, 3);
    assert_eq!(state.cost(), 3);
}

#[test]
fn test_limit_zero_disables_scoring() {
    let index = three_segment_index();
    let query = prepare_abc(&index, 0);
    assert_eq!(query.stats().num_units(), 0);
    for ord in 0..3u64 {
        let state = query.state(SegmentId::new(ord)).unwrap();
        assert!(state.scored_terms.is_empty());
        assert_eq!(state.scored_cost, 0);
        assert_eq!(state.unscored_terms.len(), 1);
    }
}

#[test]
fn test_execute_unions_scored_and_unscored_streams() {
    let mut index = MemIndex::new();
    let mut seg = MemSegment::new(SegmentId::new(0), 4);
    // "ab" wins the single scored slot on doc frequency; "aa" only matches
    seg.add_term("f", b"aa", &[(0, 4)]);
    seg.add_term("f", b"ab", &[(1, 1), (2, 2), (3, 1)]);
    index.add_segment(seg);

    let order = tfidf_order();
    let query =
        prepare_multiterm(&index, order.clone(), 1, &PrefixMatcher::new("f", b"a")).unwrap();
    assert_eq!(query.stats().num_units(), 1);

    let mut scorer = query.execute(index.segment(0)).unwrap();
    let mut buf = vec![0u8; order.score_size()];
    let mut scores = Vec::new();
    let mut doc = scorer.doc();
    while doc != TERMINATED {
        scorer.score(&mut buf);
        scores.push((doc, Score::from_le_bytes(buf[..4].try_into().unwrap())));
        doc = scorer.advance();
    }
    let docs: Vec<u32> = scores.iter().map(|&(doc, _)| doc).collect();
    assert_eq!(docs, vec![0, 1, 2, 3]);
    // doc 0 matches the unscored term only
    assert_eq!(scores[0].1, 0.0);
    assert!(scores[1].1 > 0.0);
    // higher term frequency, higher score
    assert!(scores[2].1 > scores[1].1);
    assert_eq!(scores[1].1, scores[3].1);
}

#[test]
fn test_execute_on_untouched_segment_matches_nothing() {
    let index = three_segment_index();
    let query = prepare_abc(&index, 2);
    let foreign = MemSegment::new(SegmentId::new(99), 5);
    let scorer = query.execute(&foreign).unwrap();
    assert_eq!(scorer.doc(), TERMINATED);
    assert!(query.state(SegmentId::new(99)).is_none());
}

#[test]
fn test_segment_without_field_is_skipped() {
    let mut index = MemIndex::new();
    let mut seg = MemSegment::new(SegmentId::new(0), 2);
    seg.add_term("f", b"a", &docs(0..2));
    index.add_segment(seg);
    let mut seg = MemSegment::new(SegmentId::new(1), 2);
    seg.add_term("other", b"a", &docs(0..2));
    index.add_segment(seg);

    let matcher = TermSetMatcher::new("f", vec![b"a".to_vec()]);
    let query = prepare_multiterm(&index, tfidf_order(), 4, &matcher).unwrap();
    assert!(query.state(SegmentId::new(0)).is_some());
    assert!(query.state(SegmentId::new(1)).is_none());
    let scorer = query.execute(index.segment(1)).unwrap();
    assert_eq!(scorer.doc(), TERMINATED);
}

#[test]
fn test_no_match_still_builds_field_statistics() {
    let index = three_segment_index();
    let matcher = TermSetMatcher::new("f", vec![b"zzz".to_vec()]);
    let query = prepare_multiterm(&index, tfidf_order(), 2, &matcher).unwrap();
    // the fields were visited even though nothing matched
    assert_eq!(query.stats().num_units(), 1);
    for ord in 0..3u64 {
        assert!(query.state(SegmentId::new(ord)).is_none());
    }
}

#[test]
fn test_field_absent_everywhere_collects_nothing() {
    let mut index = MemIndex::new();
    let mut seg = MemSegment::new(SegmentId::new(0), 2);
    seg.add_term("other", b"a", &docs(0..2));
    index.add_segment(seg);

    let matcher = TermSetMatcher::new("f", vec![b"a".to_vec()]);
    let query = prepare_multiterm(&index, tfidf_order(), 4, &matcher).unwrap();
    // no segment has the field: no field-only unit either
    assert_eq!(query.stats().num_units(), 0);
    assert!(query.state(SegmentId::new(0)).is_none());
}

#[test]
fn test_shared_term_scores_identically_across_segments() {
    let mut index = MemIndex::new();
    for ord in 0..2u64 {
        let mut seg = MemSegment::new(SegmentId::new(ord), 3);
        seg.add_term("f", b"shared", &docs(0..3));
        index.add_segment(seg);
    }
    let matcher = TermSetMatcher::new("f", vec![b"shared".to_vec()]);
    let order = tfidf_order();
    let query = prepare_multiterm(&index, order.clone(), 4, &matcher).unwrap();
    // both promoted records point at the same statistics unit
    assert_eq!(query.stats().num_units(), 1);

    let mut buf = vec![0u8; order.score_size()];
    let mut per_segment = Vec::new();
    for ord in 0..2 {
        let mut scorer = query.execute(index.segment(ord)).unwrap();
        assert_eq!(scorer.doc(), 0);
        scorer.score(&mut buf);
        per_segment.push(Score::from_le_bytes(buf[..4].try_into().unwrap()));
    }
    assert_eq!(per_segment[0], per_segment[1]);
    assert!(per_segment[0] > 0.0);
}

#[test]
fn test_score_buffers_order_documents() {
    let mut index = MemIndex::new();
    let mut seg = MemSegment::new(SegmentId::new(0), 3);
    seg.add_term("f", b"t", &[(0, 1), (1, 9), (2, 4)]);
    index.add_segment(seg);
    let matcher = TermSetMatcher::new("f", vec![b"t".to_vec()]);
    let order = tfidf_order();
    let query = prepare_multiterm(&index, order.clone(), 1, &matcher).unwrap();

    let mut scorer = query.execute(index.segment(0)).unwrap();
    let mut buffers = Vec::new();
    let mut doc = scorer.doc();
    while doc != TERMINATED {
        let mut buf = vec![0u8; order.score_size()];
        scorer.score(&mut buf);
        buffers.push(buf);
        doc = scorer.advance();
    }
    // term frequency 1 < 4 < 9
    assert!(order.less(Some(&buffers[0]), Some(&buffers[2])));
    assert!(order.less(Some(&buffers[2]), Some(&buffers[1])));
    assert!(!order.less(Some(&buffers[1]), Some(&buffers[0])));
    // a present buffer always precedes a missing one
    assert!(order.less(Some(&buffers[0]), None));
    assert!(!order.less(None, Some(&buffers[0])));
}
