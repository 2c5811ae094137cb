//! Lead filter compilation.
//!
//! A [`FilterOptions`] record compiles into a [`Pipeline`] the store runs, plus, when
//! filtering stays in the application, a [`KeywordPredicate`] applied to every
//! document the store returns.

pub mod compile;
pub mod keywords;
pub mod options;
pub mod pipeline;

pub use compile::{CompiledQuery, EmailExclusion, FilterMode, compile};
pub use keywords::{KeywordPredicate, KeywordSet};
pub use options::{ADULT_CONTENT_TERMS, FilterOptions};
pub use pipeline::{FieldCondition, MatchOp, MatchStage, Pipeline, SearchStage};
