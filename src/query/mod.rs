//! Query execution: scorers, posting unions and multi-term filters.

mod multiterm;
mod scorer;
mod top_k;
mod union;

pub use self::multiterm::{
    prepare_multiterm, MatchedTerm, MultiTermQuery, MultiTermState, PrefixMatcher, ScoredTermState,
    TermMatcher, TermSetMatcher, UnscoredTermState,
};
pub use self::scorer::{EmptyScorer, Scorer};
pub use self::top_k::{BoundedTopKSelector, TermCandidate};
pub use self::union::{ScoredStream, ScoredUnion};
