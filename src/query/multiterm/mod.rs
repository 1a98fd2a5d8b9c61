//! Multi-term filters: one prepare walk over all segments, then lazy
//! per-segment execution from cached state.

mod prepare;
mod query;
mod state;

pub use self::prepare::{prepare_multiterm, MatchedTerm, PrefixMatcher, TermMatcher, TermSetMatcher};
pub use self::query::MultiTermQuery;
pub use self::state::{MultiTermState, ScoredTermState, UnscoredTermState};
