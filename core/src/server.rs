use std::io::{BufRead, Write};

use crate::coordinator::BaseCoordinator;
use crate::dispatcher::Dispatcher;
use crate::{Result, SearchConfig};

/// Document base plus query evaluation behind one handle.
///
/// Both operations take `&self`: a base update may run on one thread while a query round runs
/// on another. Updates must not overlap each other.
#[derive(Debug, Default)]
pub struct SearchServer {
    coordinator: BaseCoordinator,
    config: SearchConfig,
}

impl SearchServer {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { coordinator: BaseCoordinator::new(), config })
    }

    pub fn from_documents<R: BufRead>(input: R, config: SearchConfig) -> Result<Self> {
        let server = Self::new(config)?;
        server.update_document_base(input)?;
        Ok(server)
    }

    pub fn update_document_base<R: BufRead>(&self, input: R) -> Result<()> {
        self.coordinator.update_document_base(input)
    }

    pub fn add_queries_stream<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<()> {
        Dispatcher::new(&self.coordinator, &self.config)?.evaluate(input, output)
    }

    pub fn document_count(&self) -> usize {
        self.coordinator.active_index().document_count()
    }

    pub fn word_count(&self) -> usize {
        self.coordinator.active_index().word_count()
    }

    pub fn config(&self) -> &SearchConfig { &self.config }
}
