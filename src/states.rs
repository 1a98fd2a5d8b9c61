use rustc_hash::FxHashMap;

use crate::reader::SegmentId;

/// Per-query map from segment identity to one per-segment state record.
///
/// States are built lazily during the single-threaded prepare walk and read
/// many times at execute time. There is no removal: entries live exactly as
/// long as the query. Concurrent [`StatesCache::find`] calls are safe once
/// prepare has completed, since the cache is no longer mutated.
pub struct StatesCache<S> {
    states: FxHashMap<SegmentId, S>,
}

impl<S: Default> StatesCache<S> {
    /// Creates a cache with capacity pre-reserved for `segment_count`
    /// segments, so the prepare walk never rehashes.
    pub fn new(segment_count: usize) -> StatesCache<S> {
        StatesCache {
            states: FxHashMap::with_capacity_and_hasher(segment_count, Default::default()),
        }
    }

    /// Returns the existing state for `segment`, default-constructing and
    /// inserting one on first use.
    pub fn insert(&mut self, segment: SegmentId) -> &mut S {
        self.states.entry(segment).or_default()
    }

    /// Read-only lookup used at execute time.
    pub fn find(&self, segment: SegmentId) -> Option<&S> {
        self.states.get(&segment)
    }

    /// Number of segments with a state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True iff no segment produced a state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::StatesCache;
    use crate::reader::SegmentId;

    #[derive(Default, Debug, PartialEq)]
    struct State {
        terms: Vec<u32>,
    }

    #[test]
    fn test_insert_then_find_returns_same_state() {
        let mut cache = StatesCache::<State>::new(4);
        cache.insert(SegmentId::new(1)).terms.push(7);
        cache.insert(SegmentId::new(1)).terms.push(9);
        assert_eq!(
            cache.find(SegmentId::new(1)),
            Some(&State { terms: vec![7, 9] })
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_find_never_inserted() {
        let mut cache = StatesCache::<State>::new(4);
        cache.insert(SegmentId::new(1));
        assert!(cache.find(SegmentId::new(2)).is_none());
    }

    #[test]
    fn test_identity_not_content() {
        let mut cache = StatesCache::<State>::new(4);
        cache.insert(SegmentId::new(1)).terms.push(7);
        cache.insert(SegmentId::new(2)).terms.push(7);
        // structurally identical states, distinct entries
        assert_eq!(cache.len(), 2);
    }
}
