//! Programmatic form of the `leadsift` subcommands.

use crate::config::{AppConfig, Backend, redact_uri};
use crate::errors::LeadsError;
use crate::filter::{FilterOptions, compile};
use crate::search::LeadSearch;
use crate::store::{LeadStore, MemoryStore};

pub enum Command {
    /// Serve HTTP on the configured bind address.
    Serve,
    /// Run one search and print the payload as JSON.
    Search { filters: Option<String>, array: bool },
    /// Print the compiled pipeline without touching a store.
    Pipeline { filters: Option<String> },
    /// Print compiled features and the effective configuration.
    Features,
}

/// Runs `cmd` against the store selected by `cfg`.
///
/// # Errors
/// Returns config errors for an unusable store selection, and whatever the command
/// itself fails with.
pub async fn run(cfg: &AppConfig, cmd: Command) -> Result<(), LeadsError> {
    match cmd {
        Command::Pipeline { filters } => print_pipeline(cfg, filters.as_deref()),
        Command::Features => {
            println!("features={}", crate::COMPILED_FEATURES.join(","));
            println!("profile={}", crate::BUILD_PROFILE);
            println!("backend={:?}", cfg.store.backend);
            println!("uri={}", redact_uri(&cfg.store.uri));
            println!("collection={}.{}", cfg.store.database, cfg.store.collection);
            println!("email_exclusion={:?}", cfg.email_exclusion);
            Ok(())
        }
        Command::Serve => match cfg.store.backend {
            Backend::Memory => serve(cfg, memory_store(cfg)?).await,
            Backend::Mongo => serve(cfg, mongo_store(cfg)?).await,
        },
        Command::Search { filters, array } => {
            let opts = FilterOptions::from_query(filters.as_deref())?;
            match cfg.store.backend {
                Backend::Memory => search_once(cfg, memory_store(cfg)?, &opts, array).await,
                Backend::Mongo => search_once(cfg, mongo_store(cfg)?, &opts, array).await,
            }
        }
    }
}

fn print_pipeline(cfg: &AppConfig, filters: Option<&str>) -> Result<(), LeadsError> {
    let opts = FilterOptions::from_query(filters)?;
    let q = compile(&opts, cfg.email_exclusion)?;
    println!("mode={}", q.mode);
    println!("{}", serde_json::to_string_pretty(&q.pipeline.to_json())?);
    if let Some(p) = &q.predicate {
        println!("keywords +{:?} -{:?}", p.positive().terms(), p.negative().terms());
    }
    if q.matches_nothing() {
        println!("(no positive keywords: matches nothing)");
    }
    Ok(())
}

async fn serve<S: LeadStore>(cfg: &AppConfig, store: S) -> Result<(), LeadsError> {
    crate::http::serve(&cfg.bind, LeadSearch::new(store, cfg.email_exclusion)).await
}

async fn search_once<S: LeadStore>(
    cfg: &AppConfig,
    store: S,
    opts: &FilterOptions,
    array: bool,
) -> Result<(), LeadsError> {
    let rs = LeadSearch::new(store, cfg.email_exclusion).run(opts).await?;
    let out = if array { serde_json::to_string_pretty(&rs.results)? } else { serde_json::to_string_pretty(&rs)? };
    println!("{out}");
    Ok(())
}

/// The memory backend, loaded from `store.data_file` when set.
///
/// # Errors
/// Returns an error if the data file cannot be read or parsed.
pub fn memory_store(cfg: &AppConfig) -> Result<MemoryStore, LeadsError> {
    match &cfg.store.data_file {
        Some(p) => MemoryStore::load_file(p),
        None => {
            log::warn!("memory backend without data_file; every search will be empty");
            Ok(MemoryStore::new())
        }
    }
}

#[cfg(feature = "mongo")]
fn mongo_store(cfg: &AppConfig) -> Result<crate::store::MongoStore, LeadsError> {
    Ok(crate::store::MongoStore::new(&cfg.store))
}

#[cfg(not(feature = "mongo"))]
fn mongo_store(_cfg: &AppConfig) -> Result<MemoryStore, LeadsError> {
    Err(LeadsError::Config("built without the `mongo` feature; use backend = \"memory\"".into()))
}
