//! Lead search over scraped social-media profiles.
//!
//! Filter options are compiled into an aggregation pipeline (and, when keywords are
//! matched in process, a keyword predicate), run against a [`store::LeadStore`], and
//! assembled into a [`assemble::ResultSet`].
pub mod assemble;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod http;
pub mod logger;
pub mod query;
pub mod search;
pub mod store;
pub mod types;
pub mod utils;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

pub use assemble::ResultSet;
pub use errors::LeadsError;
pub use filter::{EmailExclusion, FilterOptions};
pub use search::LeadSearch;
pub use types::LeadDocument;
