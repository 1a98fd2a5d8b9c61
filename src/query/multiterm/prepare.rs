use std::sync::Arc;

use log::debug;

use crate::query::multiterm::MultiTermQuery;
use crate::query::top_k::{BoundedTopKSelector, TermCandidate};
use crate::reader::{IndexReader, SeekResult, TermIterator};
use crate::score::{FieldCollectors, PreparedOrder};
use crate::states::StatesCache;

/// One candidate term accepted by a [`TermMatcher`].
pub struct MatchedTerm<K> {
    /// Selection key; the terms with the largest keys are scored.
    pub key: K,
    /// The term's individual weight, folded into its scorers at execute
    /// time. Fuzzy matchers typically derive it from the edit distance.
    pub boost: f32,
}

/// The term-generation collaborator of a multi-term filter: walks the
/// candidate terms of one segment's field and reports the matches.
///
/// Implementations position the iterator; the driver captures cookie, term
/// bytes and doc frequency through it.
pub trait TermMatcher {
    type Key: Ord + 'static;

    /// Name of the queried field.
    fn field(&self) -> &str;

    /// Visits all candidate terms of one segment, calling `sink` once per
    /// match with the iterator positioned on the matched term.
    fn visit(
        &self,
        terms: &mut dyn TermIterator,
        sink: &mut dyn FnMut(&mut dyn TermIterator, MatchedTerm<Self::Key>),
    ) -> crate::Result<()>;
}

/// Prepare phase of a multi-term filter.
///
/// Walks every segment sequentially: locates the field (absence skips the
/// segment), collects field-wide facts, feeds every candidate term to the
/// bounded selector, then finalizes statistics and fills the per-segment
/// state cache. `limit` is the scored-terms budget; `0` disables scoring.
pub fn prepare_multiterm<M: TermMatcher + ?Sized>(
    index: &dyn IndexReader,
    order: Arc<PreparedOrder>,
    limit: usize,
    matcher: &M,
) -> crate::Result<MultiTermQuery> {
    let mut selector = BoundedTopKSelector::<M::Key>::by_key(limit);
    let mut field_collectors = FieldCollectors::new(&order);
    let mut states = StatesCache::new(index.size());
    for ord in 0..index.size() {
        let segment = index.segment(ord);
        let field = match segment.field(matcher.field()) {
            Some(field) => field,
            // a missing field is not an error, the segment contributes
            // nothing
            None => continue,
        };
        if limit > 0 {
            field_collectors.collect(segment, field);
        }
        selector.prepare(ord, segment.id());
        let mut terms = field.iterator();
        matcher.visit(&mut *terms, &mut |terms, matched| {
            terms.read();
            selector.collect(TermCandidate {
                key: matched.key,
                term: terms.value().to_vec(),
                doc_freq: terms.doc_freq(),
                cookie: terms.cookie(),
                boost: matched.boost,
            });
        })?;
    }
    let (stats, contributions) = selector.score(index, &order, matcher.field(), &field_collectors);
    debug!(
        "prepared multiterm filter on field {:?}: {} segment states, {} statistics units",
        matcher.field(),
        contributions.len(),
        stats.num_units()
    );
    for (segment, state) in contributions {
        *states.insert(segment) = state;
    }
    Ok(MultiTermQuery::new(
        matcher.field().to_string(),
        order,
        states,
        stats,
    ))
}

/// Matches an explicit set of terms, keyed by document frequency.
pub struct TermSetMatcher {
    field: String,
    terms: Vec<Vec<u8>>,
}

impl TermSetMatcher {
    pub fn new(field: &str, terms: Vec<Vec<u8>>) -> TermSetMatcher {
        let mut terms = terms;
        terms.sort_unstable();
        terms.dedup();
        TermSetMatcher {
            field: field.to_string(),
            terms,
        }
    }
}

impl TermMatcher for TermSetMatcher {
    type Key = u64;

    fn field(&self) -> &str {
        &self.field
    }

    fn visit(
        &self,
        terms: &mut dyn TermIterator,
        sink: &mut dyn FnMut(&mut dyn TermIterator, MatchedTerm<u64>),
    ) -> crate::Result<()> {
        for target in &self.terms {
            if terms.seek(target) == SeekResult::Found {
                terms.read();
                let key = terms.doc_freq();
                sink(terms, MatchedTerm { key, boost: 1.0 });
            }
        }
        Ok(())
    }
}

/// Matches every term starting with a byte prefix, keyed by document
/// frequency.
pub struct PrefixMatcher {
    field: String,
    prefix: Vec<u8>,
}

impl PrefixMatcher {
    pub fn new(field: &str, prefix: &[u8]) -> PrefixMatcher {
        PrefixMatcher {
            field: field.to_string(),
            prefix: prefix.to_vec(),
        }
    }
}

impl TermMatcher for PrefixMatcher {
    type Key = u64;

    fn field(&self) -> &str {
        &self.field
    }

    fn visit(
        &self,
        terms: &mut dyn TermIterator,
        sink: &mut dyn FnMut(&mut dyn TermIterator, MatchedTerm<u64>),
    ) -> crate::Result<()> {
        if terms.seek(&self.prefix) == SeekResult::End {
            return Ok(());
        }
        loop {
            if !terms.value().starts_with(&self.prefix) {
                return Ok(());
            }
            terms.read();
            let key = terms.doc_freq();
            sink(terms, MatchedTerm { key, boost: 1.0 });
            if !terms.next() {
                return Ok(());
            }
        }
    }
}
