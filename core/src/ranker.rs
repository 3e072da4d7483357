use std::cmp::Ordering;
use std::fmt;

use crate::DocId;

/// A document and the number of query-word occurrences attributed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub doc_id: DocId,
    pub hit_count: usize,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{docid: {}, hitcount: {}}}", self.doc_id, self.hit_count)
    }
}

/// More hits first, lower doc id first on ties.
fn by_relevance(a: &Hit, b: &Hit) -> Ordering {
    b.hit_count.cmp(&a.hit_count).then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Dense per-document score vector, indexed by doc id.
///
/// One board is reused for every query of a page; [`ScoreBoard::reset`] restores it between
/// queries because ranking reorders the entries.
#[derive(Debug)]
pub struct ScoreBoard {
    hits: Vec<Hit>,
}

impl ScoreBoard {
    pub fn new(document_count: usize) -> Self {
        let hits = (0..document_count)
            .map(|id| Hit { doc_id: id as DocId, hit_count: 0 })
            .collect();
        Self { hits }
    }

    pub fn reset(&mut self) {
        for (id, hit) in self.hits.iter_mut().enumerate() {
            *hit = Hit { doc_id: id as DocId, hit_count: 0 };
        }
    }

    /// Count one hit per occurrence. Must be called before [`ScoreBoard::top`] reorders the
    /// board.
    pub fn record(&mut self, occurrences: &[DocId]) {
        for &doc_id in occurrences {
            if let Some(hit) = self.hits.get_mut(doc_id as usize) {
                hit.hit_count += 1;
            }
        }
    }

    /// The best `k` documents with at least one hit, in ranking order.
    pub fn top(&mut self, k: usize) -> impl Iterator<Item = Hit> + '_ {
        let k = k.min(self.hits.len());
        if k > 0 && k < self.hits.len() {
            self.hits.select_nth_unstable_by(k - 1, by_relevance);
        }
        self.hits[..k].sort_unstable_by(by_relevance);
        self.hits[..k].iter().copied().take_while(|hit| hit.hit_count > 0)
    }
}

/// Append `query:` followed by ` {docid: .., hitcount: ..}` per hit and a newline.
pub fn write_result_line<I>(out: &mut String, query: &str, hits: I)
where
    I: IntoIterator<Item = Hit>,
{
    out.push_str(query);
    out.push(':');
    for hit in hits {
        out.push(' ');
        out.push_str(&hit.to_string());
    }
    out.push('\n');
}
