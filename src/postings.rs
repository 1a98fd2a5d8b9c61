use std::borrow::{Borrow, BorrowMut};

use crate::docset::DocSet;
use crate::DocId;

/// Posting iterator over the documents matching one term, with access to the
/// within-document term frequency.
///
/// Codec implementations that do not store frequencies may return `1`.
pub trait Postings: DocSet {
    /// Returns the term frequency of the term within the current document.
    fn term_freq(&self) -> u32;
}

impl DocSet for Box<dyn Postings> {
    fn advance(&mut self) -> DocId {
        let unboxed: &mut dyn Postings = self.borrow_mut();
        unboxed.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let unboxed: &mut dyn Postings = self.borrow_mut();
        unboxed.seek(target)
    }

    fn doc(&self) -> DocId {
        let unboxed: &dyn Postings = self.borrow();
        unboxed.doc()
    }

    fn size_hint(&self) -> u32 {
        let unboxed: &dyn Postings = self.borrow();
        unboxed.size_hint()
    }
}

impl Postings for Box<dyn Postings> {
    fn term_freq(&self) -> u32 {
        let unboxed: &dyn Postings = self.borrow();
        unboxed.term_freq()
    }
}
