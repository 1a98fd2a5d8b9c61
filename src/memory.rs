//! In-memory implementation of the reader traits.
//!
//! This is a reference implementation, not a codec: terms live in a sorted
//! table, postings in plain vectors, and cookies name a term ordinal. It
//! backs the crate's own test suite and gives embedders a template for
//! wiring a real storage layer behind the traits.

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

use crate::docset::{DocSet, TERMINATED};
use crate::postings::Postings;
use crate::reader::{
    FieldReader, IndexReader, SeekCookie, SeekResult, SegmentId, SegmentReader, TermIterator,
};
use crate::DocId;

/// An index over a list of in-memory segments.
#[derive(Default)]
pub struct MemIndex {
    segments: Vec<MemSegment>,
}

impl MemIndex {
    pub fn new() -> MemIndex {
        MemIndex::default()
    }

    pub fn add_segment(&mut self, segment: MemSegment) {
        self.segments.push(segment);
    }
}

impl IndexReader for MemIndex {
    fn size(&self) -> usize {
        self.segments.len()
    }

    fn segment(&self, ord: usize) -> &dyn SegmentReader {
        &self.segments[ord]
    }
}

/// One in-memory segment.
pub struct MemSegment {
    id: SegmentId,
    num_docs: u64,
    fields: BTreeMap<String, MemField>,
}

impl MemSegment {
    pub fn new(id: SegmentId, num_docs: u64) -> MemSegment {
        MemSegment {
            id,
            num_docs,
            fields: BTreeMap::new(),
        }
    }

    /// Registers the postings of one term. Terms may be added in any order;
    /// the table is kept sorted.
    pub fn add_term(&mut self, field: &str, term: &[u8], docs: &[(DocId, u32)]) {
        let field = self.fields.entry(field.to_string()).or_default();
        for (doc, _) in docs {
            field.docs.insert(*doc);
        }
        let position = field
            .terms
            .partition_point(|(existing, _)| existing.as_slice() < term);
        field.terms.insert(position, (term.to_vec(), docs.to_vec()));
    }
}

impl SegmentReader for MemSegment {
    fn id(&self) -> SegmentId {
        self.id
    }

    fn field(&self, name: &str) -> Option<&dyn FieldReader> {
        self.fields.get(name).map(|field| field as &dyn FieldReader)
    }

    fn num_docs(&self) -> u64 {
        self.num_docs
    }
}

#[derive(Default)]
struct MemField {
    terms: Vec<(Vec<u8>, Vec<(DocId, u32)>)>,
    docs: FxHashSet<DocId>,
}

impl FieldReader for MemField {
    fn iterator(&self) -> Box<dyn TermIterator + '_> {
        Box::new(MemTermIterator {
            terms: &self.terms,
            cursor: Cursor::Start,
        })
    }

    fn docs_with_field(&self) -> u64 {
        self.docs.len() as u64
    }
}

/// Cookie payload: the term ordinal, plus the term bytes so a stale cookie
/// is detected instead of silently repositioning somewhere else.
struct MemCookie {
    ord: usize,
    term: Vec<u8>,
}

#[derive(Clone, Copy)]
enum Cursor {
    Start,
    At(usize),
    Done,
}

struct MemTermIterator<'a> {
    terms: &'a [(Vec<u8>, Vec<(DocId, u32)>)],
    cursor: Cursor,
}

impl MemTermIterator<'_> {
    fn position(&self) -> usize {
        match self.cursor {
            Cursor::At(ord) => ord,
            _ => panic!("term iterator is not positioned on a term"),
        }
    }
}

impl TermIterator for MemTermIterator<'_> {
    fn seek(&mut self, target: &[u8]) -> SeekResult {
        let ord = self
            .terms
            .partition_point(|(term, _)| term.as_slice() < target);
        if ord == self.terms.len() {
            self.cursor = Cursor::Done;
            return SeekResult::End;
        }
        self.cursor = Cursor::At(ord);
        if self.terms[ord].0 == target {
            SeekResult::Found
        } else {
            SeekResult::NotFound
        }
    }

    fn seek_cookie(&mut self, cookie: &SeekCookie) -> crate::Result<bool> {
        let cookie = match cookie.downcast_ref::<MemCookie>() {
            Some(cookie) => cookie,
            None => return Ok(false),
        };
        if cookie.ord < self.terms.len() && self.terms[cookie.ord].0 == cookie.term {
            self.cursor = Cursor::At(cookie.ord);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn next(&mut self) -> bool {
        let next = match self.cursor {
            Cursor::Start => 0,
            Cursor::At(ord) => ord + 1,
            Cursor::Done => return false,
        };
        if next < self.terms.len() {
            self.cursor = Cursor::At(next);
            true
        } else {
            self.cursor = Cursor::Done;
            false
        }
    }

    fn read(&mut self) {}

    fn cookie(&self) -> SeekCookie {
        let ord = self.position();
        SeekCookie::new(MemCookie {
            ord,
            term: self.terms[ord].0.clone(),
        })
    }

    fn value(&self) -> &[u8] {
        &self.terms[self.position()].0
    }

    fn doc_freq(&self) -> u64 {
        self.terms[self.position()].1.len() as u64
    }

    fn postings(&self) -> crate::Result<Box<dyn Postings>> {
        Ok(Box::new(MemPostings::from_docs(
            self.terms[self.position()].1.clone(),
        )))
    }
}

/// Posting iterator over an in-memory `(doc, term_freq)` list.
pub struct MemPostings {
    docs: Vec<(DocId, u32)>,
    cursor: usize,
}

impl MemPostings {
    /// Positions on the first document, the `DocSet` convention.
    pub fn from_docs(docs: Vec<(DocId, u32)>) -> MemPostings {
        MemPostings { docs, cursor: 0 }
    }
}

impl DocSet for MemPostings {
    fn advance(&mut self) -> DocId {
        if self.cursor < self.docs.len() {
            self.cursor += 1;
        }
        self.doc()
    }

    fn doc(&self) -> DocId {
        self.docs
            .get(self.cursor)
            .map(|&(doc, _)| doc)
            .unwrap_or(TERMINATED)
    }

    fn size_hint(&self) -> u32 {
        self.docs.len() as u32
    }
}

impl Postings for MemPostings {
    fn term_freq(&self) -> u32 {
        self.docs.get(self.cursor).map(|&(_, freq)| freq).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemPostings, MemSegment};
    use crate::docset::{DocSet, TERMINATED};
    use crate::reader::{SeekCookie, SeekResult, SegmentId, SegmentReader};

    fn segment() -> MemSegment {
        let mut segment = MemSegment::new(SegmentId::new(0), 4);
        segment.add_term("f", b"b", &[(0, 1), (2, 3)]);
        segment.add_term("f", b"a", &[(1, 1)]);
        segment.add_term("f", b"cd", &[(2, 1), (3, 1)]);
        segment
    }

    #[test]
    fn test_terms_are_sorted() {
        let segment = segment();
        let field = segment.field("f").unwrap();
        let mut terms = field.iterator();
        let mut seen = Vec::new();
        while terms.next() {
            seen.push(terms.value().to_vec());
        }
        assert_eq!(seen, vec![b"a".to_vec(), b"b".to_vec(), b"cd".to_vec()]);
    }

    #[test]
    fn test_seek_semantics() {
        let segment = segment();
        let field = segment.field("f").unwrap();
        let mut terms = field.iterator();
        assert_eq!(terms.seek(b"b"), SeekResult::Found);
        assert_eq!(terms.doc_freq(), 2);
        assert_eq!(terms.seek(b"c"), SeekResult::NotFound);
        assert_eq!(terms.value(), b"cd");
        assert_eq!(terms.seek(b"z"), SeekResult::End);
    }

    #[test]
    fn test_cookie_roundtrip() {
        let segment = segment();
        let field = segment.field("f").unwrap();
        let mut terms = field.iterator();
        assert_eq!(terms.seek(b"b"), SeekResult::Found);
        let cookie = terms.cookie();
        let mut fresh = field.iterator();
        assert!(fresh.seek_cookie(&cookie).unwrap());
        assert_eq!(fresh.value(), b"b");
        assert_eq!(fresh.doc_freq(), 2);
    }

    #[test]
    fn test_foreign_cookie_fails_reseat() {
        let segment = segment();
        let field = segment.field("f").unwrap();
        let mut terms = field.iterator();
        assert!(!terms.seek_cookie(&SeekCookie::new(42u32)).unwrap());
    }

    #[test]
    fn test_docs_with_field_is_distinct() {
        let segment = segment();
        let field = segment.field("f").unwrap();
        // docs 0..=3, several of them under more than one term
        assert_eq!(field.docs_with_field(), 4);
    }

    #[test]
    fn test_postings_positioned_on_first_doc() {
        let mut postings = MemPostings::from_docs(vec![(1, 1), (5, 2)]);
        assert_eq!(postings.doc(), 1);
        assert_eq!(postings.advance(), 5);
        assert_eq!(postings.advance(), TERMINATED);
        assert_eq!(postings.advance(), TERMINATED);
    }
}
