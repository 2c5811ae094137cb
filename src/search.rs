//! Compile, aggregate, assemble.

use crate::assemble::{ResultSet, assemble};
use crate::errors::LeadsError;
use crate::filter::{CompiledQuery, EmailExclusion, FilterOptions, compile};
use crate::logger::AUDIT_TARGET;
use crate::store::LeadStore;
use crate::utils::devlog::BenchTimer;

/// A lead search bound to one store.
pub struct LeadSearch<S> {
    store: S,
    exclusion: EmailExclusion,
}

impl<S: LeadStore> LeadSearch<S> {
    pub fn new(store: S, exclusion: EmailExclusion) -> Self {
        Self { store, exclusion }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn exclusion(&self) -> EmailExclusion {
        self.exclusion
    }

    /// Compiles `opts` under this search's exclusion policy.
    ///
    /// # Errors
    /// See [`compile`].
    pub fn compile(&self, opts: &FilterOptions) -> Result<CompiledQuery, LeadsError> {
        compile(opts, self.exclusion)
    }

    /// Runs one search.
    ///
    /// # Errors
    /// Returns `InvalidFilters` for keyword lists that cannot be compiled, and the
    /// store's error if aggregation or cursor iteration fails.
    pub async fn run(&self, opts: &FilterOptions) -> Result<ResultSet, LeadsError> {
        log::info!("received filters: {}", serde_json::to_string(opts)?);
        let t = BenchTimer::start("search");
        let q = self.compile(opts)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("pipeline ({} mode): {}", q.mode, q.pipeline.to_json());
        }

        let rs = if q.matches_nothing() {
            log::debug!("no positive keywords; skipping {}", self.store.describe());
            ResultSet::default()
        } else {
            let mut cursor = self.store.aggregate(&q.pipeline).await?;
            assemble(&mut cursor, q.predicate.as_ref()).await?
        };

        log::info!(
            "search done: mode={} matched={} phones={} emails={}",
            q.mode,
            rs.matched(),
            rs.phone_count,
            rs.email_count
        );
        log::info!(
            target: AUDIT_TARGET,
            "search caller={} mode={} matched={}",
            opts.caller_email().unwrap_or("-"),
            q.mode,
            rs.matched()
        );
        t.finish(&format!("mode={} matched={}", q.mode, rs.matched()));
        Ok(rs)
    }
}
