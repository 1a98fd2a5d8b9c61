use std::borrow::{Borrow, BorrowMut};

use crate::DocId;

/// Sentinel value returned when a `DocSet` has been entirely consumed.
pub const TERMINATED: DocId = i32::MAX as u32;

/// Represents an iterable set of sorted doc ids.
pub trait DocSet: Send {
    /// Goes to the next element.
    ///
    /// The `DocId` of the next element is returned.
    /// In other words we should always have:
    /// ```ignore
    /// let doc = docset.advance();
    /// assert_eq!(doc, docset.doc());
    /// ```
    ///
    /// If we reached the end of the `DocSet`, `TERMINATED` should be
    /// returned. Calling `.advance()` on a terminated `DocSet` should be
    /// supported, and `TERMINATED` should be returned.
    fn advance(&mut self) -> DocId;

    /// Advances the `DocSet` forward until reaching the target, or going to
    /// the lowest `DocId` greater than the target.
    ///
    /// If the end of the `DocSet` is reached, `TERMINATED` is returned.
    ///
    /// Calling `.seek(target)` on a terminated `DocSet` is legal.
    /// Calling `seek(TERMINATED)` is also legal and is the normal way to
    /// consume a `DocSet`.
    fn seek(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc();
        debug_assert!(doc <= target);
        while doc < target {
            doc = self.advance();
        }
        doc
    }

    /// Returns the current document.
    /// Right after creating a new `DocSet`, the docset points to the first
    /// document.
    ///
    /// If the `DocSet` is empty, `.doc()` should return `TERMINATED`.
    fn doc(&self) -> DocId;

    /// Returns a best-effort hint of the length of the docset.
    fn size_hint(&self) -> u32;
}

impl DocSet for Box<dyn DocSet> {
    fn advance(&mut self) -> DocId {
        let unboxed: &mut dyn DocSet = self.borrow_mut();
        unboxed.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let unboxed: &mut dyn DocSet = self.borrow_mut();
        unboxed.seek(target)
    }

    fn doc(&self) -> DocId {
        let unboxed: &dyn DocSet = self.borrow();
        unboxed.doc()
    }

    fn size_hint(&self) -> u32 {
        let unboxed: &dyn DocSet = self.borrow();
        unboxed.size_hint()
    }
}
