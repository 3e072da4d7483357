use std::collections::HashMap;
use std::io::BufRead;

use parking_lot::Mutex;

use crate::tokenizer::{for_each_line, tokenize};
use crate::{DocId, Result};

/// Word to occurrence mapping for one document base.
///
/// Every occurrence of a word contributes one entry to its list, so a document that repeats a
/// word appears that many times. Lists are ascending by doc id because ids are handed out in
/// ingestion order.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
    num_docs: u32,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Ingest one document and return the id it was given.
    pub fn add(&mut self, document: &str) -> DocId {
        let doc_id = self.num_docs;
        self.num_docs += 1;
        for word in tokenize(document) {
            match self.postings.get_mut(word) {
                Some(list) => list.push(doc_id),
                None => {
                    self.postings.insert(word.to_string(), vec![doc_id]);
                }
            }
        }
        doc_id
    }

    /// Occurrences of `word`; empty if it never appeared.
    pub fn lookup(&self, word: &str) -> &[DocId] {
        self.postings.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn document_count(&self) -> usize { self.num_docs as usize }

    /// Number of distinct words.
    pub fn word_count(&self) -> usize { self.postings.len() }
}

/// Builds a fresh [`InvertedIndex`]; a base is always rebuilt from scratch.
///
/// `add` takes `&self` so several producers may feed the same builder. Additions are
/// serialized by an internal lock and ids follow the order in which the lock was won.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: Mutex<InvertedIndex>,
}

impl IndexBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn add(&self, document: &str) -> DocId {
        self.index.lock().add(document)
    }

    /// Read one document per line until the stream ends. Invalid UTF-8 is replaced with
    /// U+FFFD.
    pub fn read_documents<R: BufRead>(self, input: R) -> Result<Self> {
        for_each_line(input, |line| {
            self.add(&line);
        })?;
        Ok(self)
    }

    pub fn finish(self) -> InvertedIndex {
        self.index.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_ingestion_order() {
        let mut index = InvertedIndex::new();
        assert_eq!(index.add("first"), 0);
        assert_eq!(index.add(""), 1);
        assert_eq!(index.add("third"), 2);
        assert_eq!(index.document_count(), 3);
    }

    #[test]
    fn lookup_lists_every_occurrence() {
        let mut index = InvertedIndex::new();
        index.add("a b c");
        index.add("b b");
        assert_eq!(index.lookup("b"), &[0, 1, 1]);
        assert_eq!(index.lookup("a"), &[0]);
        assert!(index.lookup("z").is_empty());
        assert_eq!(index.word_count(), 3);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut index = InvertedIndex::new();
        index.add("Cat cat");
        assert_eq!(index.lookup("cat"), &[0]);
        assert_eq!(index.lookup("Cat"), &[0]);
        assert!(index.lookup("CAT").is_empty());
    }

    #[test]
    fn builder_reads_lines() {
        let index = IndexBuilder::new()
            .read_documents("x y\n\ny x x\n".as_bytes())
            .unwrap()
            .finish();
        assert_eq!(index.document_count(), 3);
        assert_eq!(index.lookup("x"), &[0, 2, 2]);
    }

    #[test]
    fn invalid_utf8_document_is_still_ingested() {
        let index = IndexBuilder::new()
            .read_documents(&b"ok\n\xff bad\nfine\n"[..])
            .unwrap()
            .finish();
        assert_eq!(index.document_count(), 3);
        assert_eq!(index.lookup("bad"), &[1]);
        assert_eq!(index.lookup("\u{FFFD}"), &[1]);
    }

    #[test]
    fn builder_accepts_concurrent_producers() {
        let builder = IndexBuilder::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        builder.add("shared");
                    }
                });
            }
        });
        let index = builder.finish();
        assert_eq!(index.document_count(), 100);
        let ids = index.lookup("shared");
        assert_eq!(ids.len(), 100);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
