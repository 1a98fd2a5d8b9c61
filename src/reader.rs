//! The narrow interfaces through which the query-execution core consumes the
//! indexing/storage layer.
//!
//! Nothing in this module reads bytes off disk: the traits are implemented by
//! the codec layer (or by [`crate::memory`] for tests and embedding).

use std::any::Any;
use std::fmt;

use crate::postings::Postings;

/// Identity of one segment of the index.
///
/// Keying is by identity, not content: the caller assigns one id per segment
/// *instance*, and two segments are never equal even if structurally
/// identical. The id must stay stable for the lifetime of the query.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SegmentId(u64);

impl SegmentId {
    /// Creates a segment id from a caller-chosen unique value.
    pub fn new(id: u64) -> SegmentId {
        SegmentId(id)
    }
}

/// Opaque resumable position handle into a segment's term dictionary.
///
/// Re-submitting a cookie to a fresh iterator on the same segment repositions
/// it to the same term without re-traversing the dictionary. A cookie is
/// owned by whichever state record holds it, is never cloned, and must not
/// outlive its segment.
pub struct SeekCookie(Box<dyn Any + Send + Sync>);

impl SeekCookie {
    /// Wraps an implementation-defined payload.
    pub fn new<T: Any + Send + Sync>(payload: T) -> SeekCookie {
        SeekCookie(Box::new(payload))
    }

    /// Gives the term-iterator implementation its payload back.
    ///
    /// Returns `None` when the cookie was produced by a different
    /// implementation, which a reseat must treat as a failure.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for SeekCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeekCookie(..)")
    }
}

/// Outcome of repositioning a term iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekResult {
    /// Positioned on the target term itself.
    Found,
    /// Positioned on the first term greater than the target.
    NotFound,
    /// No term at or after the target; the iterator is exhausted.
    End,
}

/// Iterator over the sorted terms of one field of one segment.
pub trait TermIterator {
    /// Advances to the first term greater than or equal to `target`.
    fn seek(&mut self, target: &[u8]) -> SeekResult;

    /// Repositions the iterator to the term a cookie was captured from.
    ///
    /// Returns `Ok(false)` when the position the cookie names no longer
    /// exists (e.g. the cookie belongs to another field or segment).
    fn seek_cookie(&mut self, cookie: &SeekCookie) -> crate::Result<bool>;

    /// Advances to the next term. Returns `false` once exhausted.
    fn next(&mut self) -> bool;

    /// Loads the attributes of the current term (doc frequency, ...).
    ///
    /// Must be called before [`TermIterator::doc_freq`] on codecs that
    /// decode term attributes lazily.
    fn read(&mut self);

    /// Captures a resumable handle for the current position.
    fn cookie(&self) -> SeekCookie;

    /// The bytes of the current term.
    fn value(&self) -> &[u8];

    /// Number of documents containing the current term.
    fn doc_freq(&self) -> u64;

    /// Opens a posting iterator over the documents of the current term.
    fn postings(&self) -> crate::Result<Box<dyn Postings>>;
}

/// Per-segment view over one field's term dictionary.
pub trait FieldReader {
    /// A fresh iterator positioned before the first term of the field.
    fn iterator(&self) -> Box<dyn TermIterator + '_>;

    /// Number of documents of the segment containing this field.
    fn docs_with_field(&self) -> u64;
}

/// One self-contained partition of the index, queried independently.
pub trait SegmentReader: Send + Sync {
    /// The segment's identity. See [`SegmentId`].
    fn id(&self) -> SegmentId;

    /// Accesses one field of the segment.
    ///
    /// A missing field is not an error: the query simply skips the segment.
    fn field(&self, name: &str) -> Option<&dyn FieldReader>;

    /// Number of documents in the segment.
    fn num_docs(&self) -> u64;
}

/// Read-only view over all segments of the index, frozen for the duration of
/// a query.
pub trait IndexReader: Send + Sync {
    /// Number of segments.
    fn size(&self) -> usize;

    /// Accesses the segment with the given ordinal, `0..size()`.
    fn segment(&self, ord: usize) -> &dyn SegmentReader;

    /// Total number of documents across all segments.
    fn num_docs(&self) -> u64 {
        (0..self.size()).map(|ord| self.segment(ord).num_docs()).sum()
    }
}
