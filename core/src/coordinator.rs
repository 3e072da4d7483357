//! Ownership of the active index and the swap barrier against running query rounds.
//!
//! A round registers one lock per page and keeps the returned [`RoundRegistration`] alive
//! while its workers run. Workers hold their page lock for each word lookup. Replacing the
//! index first takes every page lock of every registered round, so no lookup is in flight at
//! the moment of the swap.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::index::{IndexBuilder, InvertedIndex};
use crate::Result;

/// One lock per page of a round.
#[derive(Debug)]
pub struct PageLocks {
    locks: Vec<Mutex<()>>,
}

impl PageLocks {
    fn new(pages: usize) -> Self {
        Self { locks: (0..pages).map(|_| Mutex::new(())).collect() }
    }

    pub fn len(&self) -> usize { self.locks.len() }

    pub fn is_empty(&self) -> bool { self.locks.is_empty() }

    /// Block until `page`'s lock is free.
    ///
    /// # Panics
    /// If `page` is not a page of this round.
    pub fn lock(&self, page: usize) -> MutexGuard<'_, ()> {
        self.locks[page].lock()
    }

    fn lock_all(&self) -> Vec<MutexGuard<'_, ()>> {
        self.locks.iter().map(Mutex::lock).collect()
    }
}

/// Holds the active [`InvertedIndex`] and exchanges it for rebuilt ones.
#[derive(Debug, Default)]
pub struct BaseCoordinator {
    active: RwLock<Arc<InvertedIndex>>,
    rounds: Mutex<Vec<Arc<PageLocks>>>,
}

impl BaseCoordinator {
    pub fn new() -> Self { Self::default() }

    pub fn with_index(index: InvertedIndex) -> Self {
        Self { active: RwLock::new(Arc::new(index)), rounds: Mutex::default() }
    }

    pub fn active_index(&self) -> Arc<InvertedIndex> {
        self.active.read().clone()
    }

    pub fn has_active_round(&self) -> bool {
        !self.rounds.lock().is_empty()
    }

    /// Register a round of `pages` pages and pin the index it will read.
    ///
    /// The round is deregistered when the returned handle is dropped.
    pub fn register_round(&self, pages: usize) -> RoundRegistration<'_> {
        let locks = Arc::new(PageLocks::new(pages));
        let mut rounds = self.rounds.lock();
        rounds.push(Arc::clone(&locks));
        // Read under the registry lock so a concurrent replace is either fully before or
        // fully after this round.
        let index = self.active_index();
        drop(rounds);
        tracing::debug!(pages, documents = index.document_count(), "round registered");
        RoundRegistration { coordinator: self, locks, index }
    }

    fn deregister(&self, locks: &Arc<PageLocks>) {
        self.rounds.lock().retain(|registered| !Arc::ptr_eq(registered, locks));
    }

    /// Make `index` the active base.
    ///
    /// Waits until every page of every registered round is between lookups, then swaps the
    /// reference. The previous index is dropped once the last round pinning it finishes.
    pub fn replace(&self, index: InvertedIndex) {
        let index = Arc::new(index);
        let documents = index.document_count();
        let words = index.word_count();

        let rounds = self.rounds.lock();
        let barrier: Vec<_> = rounds.iter().map(|locks| locks.lock_all()).collect();
        *self.active.write() = index;
        drop(barrier);
        let guarded_rounds = rounds.len();
        drop(rounds);

        tracing::info!(documents, words, guarded_rounds, "document base replaced");
    }

    /// Rebuild the base from `input`, one document per line, and make it active.
    ///
    /// Two updates must not overlap on one coordinator: each swap is safe on its own but
    /// which base ends up active is then unspecified.
    pub fn update_document_base<R: BufRead>(&self, input: R) -> Result<()> {
        let start = Instant::now();
        let index = IndexBuilder::new().read_documents(input)?.finish();
        tracing::debug!(
            documents = index.document_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "document base built"
        );
        self.replace(index);
        Ok(())
    }
}

/// A live round: its page locks plus the index snapshot all of its lookups use.
#[derive(Debug)]
pub struct RoundRegistration<'a> {
    coordinator: &'a BaseCoordinator,
    locks: Arc<PageLocks>,
    index: Arc<InvertedIndex>,
}

impl RoundRegistration<'_> {
    pub fn locks(&self) -> &PageLocks { &self.locks }

    pub fn index(&self) -> &InvertedIndex { &self.index }
}

impl Drop for RoundRegistration<'_> {
    fn drop(&mut self) {
        self.coordinator.deregister(&self.locks);
        tracing::debug!(pages = self.locks.len(), "round deregistered");
    }
}
