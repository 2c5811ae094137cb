//! Embedded evaluator for `$match`-style filters over BSON documents.
//!
//! Backs the in-memory lead store so a pipeline can run without a database.

mod eval;
mod types;

pub use eval::{compare_bson, eval_filter, project_fields};
pub use types::{CmpOp, Filter, MAX_PATH_DEPTH};
