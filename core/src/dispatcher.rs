//! Query rounds: split a batch into pages, evaluate every page on its own thread, and stitch
//! the page outputs back together in input order.

use std::any::Any;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Instant;

use crate::coordinator::{BaseCoordinator, PageLocks};
use crate::index::InvertedIndex;
use crate::ranker::{write_result_line, ScoreBoard};
use crate::tokenizer::{for_each_line, tokenize};
use crate::{Error, Result, SearchConfig};

pub struct Dispatcher<'a> {
    coordinator: &'a BaseCoordinator,
    page_size: usize,
    top_k: usize,
}

impl<'a> Dispatcher<'a> {
    pub fn new(coordinator: &'a BaseCoordinator, config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { coordinator, page_size: config.page_size, top_k: config.top_k })
    }

    /// Read every query line from `input`, then write one result line per query to `output`.
    /// Invalid UTF-8 in a query is replaced with U+FFFD.
    ///
    /// Nothing is written if any page fails.
    pub fn evaluate<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        let mut queries = Vec::new();
        for_each_line(input, |line| queries.push(line))?;
        for block in self.evaluate_queries(&queries)? {
            output.write_all(block.as_bytes())?;
        }
        output.flush()?;
        Ok(())
    }

    /// Evaluate a batch and return one text block per page, in page order.
    pub fn evaluate_queries(&self, queries: &[String]) -> Result<Vec<String>> {
        let start = Instant::now();
        let pages = queries.len().div_ceil(self.page_size);
        let round = self.coordinator.register_round(pages);
        let index = round.index();
        let locks = round.locks();
        let document_count = index.document_count();

        let blocks = run_pages(queries, self.page_size, |page, page_queries| {
            evaluate_page(index, locks, page, page_queries, document_count, self.top_k)
        })?;

        tracing::debug!(
            queries = queries.len(),
            pages,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "round complete"
        );
        Ok(blocks)
    }
}

fn evaluate_page(
    index: &InvertedIndex,
    locks: &PageLocks,
    page: usize,
    queries: &[String],
    document_count: usize,
    top_k: usize,
) -> String {
    let mut out = String::new();
    let mut board = ScoreBoard::new(document_count);
    for query in queries {
        board.reset();
        for word in tokenize(query) {
            let _guard = locks.lock(page);
            board.record(index.lookup(word));
        }
        write_result_line(&mut out, query, board.top(top_k));
    }
    tracing::trace!(page, queries = queries.len(), "page evaluated");
    out
}

/// Run `work` once per `page_size` chunk of `queries`, each on its own thread.
///
/// Every started worker is joined before returning. Results come back indexed by page; the
/// first failing page (spawn or panic) turns into the round's error.
pub(crate) fn run_pages<T, F>(queries: &[String], page_size: usize, work: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(usize, &[String]) -> T + Sync,
{
    thread::scope(|scope| {
        let work = &work;
        let mut handles = Vec::new();
        let mut spawn_error = None;
        for (page, page_queries) in queries.chunks(page_size).enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("page-{page}"))
                .spawn_scoped(scope, move || work(page, page_queries));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    spawn_error = Some(Error::Spawn { page, source });
                    break;
                }
            }
        }

        let joined: Vec<Result<T>> = handles
            .into_iter()
            .enumerate()
            .map(|(page, handle)| {
                handle.join().map_err(|payload| Error::WorkerPanicked {
                    page,
                    message: panic_message(payload.as_ref()),
                })
            })
            .collect();

        let results = joined.into_iter().collect::<Result<Vec<T>>>();
        match (results, spawn_error) {
            (Err(err), _) | (Ok(_), Some(err)) => {
                tracing::error!(error = %err, "query round failed");
                Err(err)
            }
            (Ok(results), None) => Ok(results),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
