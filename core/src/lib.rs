pub mod config;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod index;
pub mod ranker;
pub mod server;
pub mod tokenizer;

pub use config::SearchConfig;
pub use coordinator::{BaseCoordinator, PageLocks, RoundRegistration};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use index::{IndexBuilder, InvertedIndex};
pub use ranker::{Hit, ScoreBoard};
pub use server::SearchServer;

/// Position of a document within the active base, assigned in ingestion order from 0.
pub type DocId = u32;
