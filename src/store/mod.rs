//! Lead stores run compiled pipelines and hand back a cursor of candidates.
//!
//! The search service is generic over [`LeadStore`], so tests and offline runs
//! can swap the MongoDB collection for an in-memory one.

mod memory;
#[cfg(feature = "mongo")]
mod mongo;

pub use memory::{MemoryCursor, MemoryStore};
#[cfg(feature = "mongo")]
pub use mongo::{MongoCursor, MongoStore};

use crate::errors::LeadsError;
use crate::filter::Pipeline;
use crate::types::LeadDocument;
use std::future::Future;

pub trait LeadStore: Send + Sync + 'static {
    type Cursor: LeadCursor;

    /// Runs `pipeline` and returns a cursor over its output.
    fn aggregate(
        &self,
        pipeline: &Pipeline,
    ) -> impl Future<Output = Result<Self::Cursor, LeadsError>> + Send;

    /// Short description for logs; never includes credentials.
    fn describe(&self) -> String;
}

pub trait LeadCursor: Send {
    /// Next document, or `None` once the cursor is exhausted.
    fn next_lead(&mut self) -> impl Future<Output = Result<Option<LeadDocument>, LeadsError>> + Send;
}
