//! # `columbite`
//!
//! Columbite is the query-execution core of a segmented search index: it
//! prepares multi-term filters across all segments of an
//! [`IndexReader`](crate::reader::IndexReader), selects the best terms under
//! a bounded budget, accumulates index-wide scoring statistics into one
//! aligned byte buffer, and lazily executes each segment from the cached
//! per-segment state.
//!
//! The indexing and storage layer stays behind the narrow traits of
//! [`reader`]; [`memory`] ships an in-memory implementation of them.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use columbite::memory::{MemIndex, MemSegment};
//! use columbite::query::{prepare_multiterm, PrefixMatcher};
//! use columbite::reader::SegmentId;
//! use columbite::score::{ScoringOrder, TfIdf};
//! use columbite::{DocSet, IndexReader};
//!
//! # fn main() -> columbite::Result<()> {
//! let mut segment = MemSegment::new(SegmentId::new(0), 2);
//! segment.add_term("body", b"rust", &[(0, 2), (1, 1)]);
//! segment.add_term("body", b"rusty", &[(1, 3)]);
//! let mut index = MemIndex::new();
//! index.add_segment(segment);
//!
//! let mut order = ScoringOrder::new();
//! order.push(Box::new(TfIdf::default()), false);
//! let order = Arc::new(order.prepare()?);
//!
//! let query = prepare_multiterm(&index, order, 16, &PrefixMatcher::new("body", b"rus"))?;
//! let scorer = query.execute(index.segment(0))?;
//! assert_eq!(scorer.doc(), 0);
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod macros;

pub mod docset;
mod error;
pub mod memory;
pub mod postings;
pub mod query;
pub mod reader;
pub mod score;
pub mod states;

pub use self::docset::{DocSet, TERMINATED};
pub use self::error::ColumbiteError;
pub use self::postings::Postings;
pub use self::reader::{IndexReader, SegmentId, SegmentReader};

/// A u32 identifying a document within a segment. Documents have their
/// `DocId` assigned incrementally, as they are added in the segment.
pub type DocId = u32;

/// A f32 that represents the relevance of the document to the query.
pub type Score = f32;

/// Columbite's result type: `Err` wraps a [`ColumbiteError`].
pub type Result<T> = std::result::Result<T, ColumbiteError>;
