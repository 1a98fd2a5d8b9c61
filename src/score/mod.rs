//! Scoring order model: composable scoring functions, their shared buffer
//! layouts, and the statistics-collection machinery feeding them.
//!
//! A query configures an ordered list of scoring functions. Preparing the
//! order assigns every function a byte-precise slot within two buffers: the
//! per-query statistics buffer (written once, during prepare) and the
//! per-document score buffer (written once per candidate document, at
//! execute time). The execution core never interprets slot contents; it only
//! places, compares and merges them through the slot's own function.

mod collectors;
mod function;
mod match_count;
mod order;
mod stats;
mod tfidf;

pub use self::collectors::{FieldCollectors, TermCollectors};
pub use self::function::{
    BufferLayout, FieldCollector, PreparedScoreFunction, ScoreFunction, TermCollector,
    TermFacts, TermScoreFn, MAX_SLOT_ALIGN,
};
pub use self::match_count::MatchCount;
pub use self::order::{PreparedOrder, ScoreSlot, ScoringOrder};
pub use self::stats::{Stats, StatsBuilder};
pub use self::tfidf::TfIdf;
