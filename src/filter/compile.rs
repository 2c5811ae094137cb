use crate::errors::LeadsError;
use crate::types::{PLACEHOLDER, PRIVATE};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::keywords::KeywordPredicate;
use super::options::FilterOptions;
use super::pipeline::{
    APPLICATION_SIDE_LIMIT, DATABASE_SIDE_LIMIT, MatchOp, MatchStage, Pipeline, SEARCH_INDEX,
    SearchStage,
};

/// When leads tagged with the caller's email are left out of results.
///
/// In both policies an empty caller email excludes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailExclusion {
    /// Exclude the caller's leads on every search.
    #[default]
    Always,
    /// Exclude them only when `excludeExportedLeads` is set.
    WhenRequested,
}

impl std::str::FromStr for EmailExclusion {
    type Err = LeadsError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "when-requested" | "when_requested" => Ok(Self::WhenRequested),
            other => Err(LeadsError::Config(format!("unknown email exclusion policy: {other}"))),
        }
    }
}

/// Where keyword filtering happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Database,
    Application,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Database => "database",
            Self::Application => "application",
        })
    }
}

/// Output of [`compile`].
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub mode: FilterMode,
    pub pipeline: Pipeline,
    /// Present in application mode only.
    pub predicate: Option<KeywordPredicate>,
}

impl CompiledQuery {
    /// True when no document can pass, which is the case whenever the positive
    /// keyword list is empty. Both modes agree on this, so callers may skip the store.
    #[must_use]
    pub fn matches_nothing(&self) -> bool {
        match (&self.predicate, &self.pipeline.search) {
            (Some(p), _) => p.positive().is_empty(),
            (None, Some(s)) => s.should.is_empty(),
            (None, None) => false,
        }
    }
}

/// Compiles `opts` into a pipeline, and a keyword predicate when keywords stay in process.
///
/// # Errors
/// Returns `LeadsError::InvalidFilters` if a keyword list cannot be compiled.
pub fn compile(opts: &FilterOptions, exclusion: EmailExclusion) -> Result<CompiledQuery, LeadsError> {
    let negative = opts.effective_negative_keywords();
    let positive: Vec<String> =
        opts.positive_keywords.iter().filter(|k| !k.trim().is_empty()).cloned().collect();
    let negative: Vec<String> = negative.into_iter().filter(|k| !k.trim().is_empty()).collect();
    let matcher = match_stage(opts, exclusion);

    if opts.filter_in_mongo {
        let search = SearchStage { index: SEARCH_INDEX.to_string(), should: positive, must_not: negative };
        return Ok(CompiledQuery {
            mode: FilterMode::Database,
            pipeline: Pipeline::new(Some(search), matcher, DATABASE_SIDE_LIMIT),
            predicate: None,
        });
    }
    Ok(CompiledQuery {
        mode: FilterMode::Application,
        pipeline: Pipeline::new(None, matcher, APPLICATION_SIDE_LIMIT),
        predicate: Some(KeywordPredicate::new(positive.as_slice(), negative.as_slice())?),
    })
}

fn match_stage(opts: &FilterOptions, exclusion: EmailExclusion) -> MatchStage {
    let mut m = MatchStage::default();
    if let Some(n) = opts.min_followers {
        m.push("fol_cnt", MatchOp::Gte(n));
    }
    if let Some(n) = opts.max_followers {
        m.push("fol_cnt", MatchOp::Lte(n));
    }
    if let Some(n) = opts.min_posts {
        m.push("post_cnt", MatchOp::Gte(n));
    }
    if opts.include_profile_picture {
        m.push("avatar", MatchOp::Ne(PLACEHOLDER.into()));
    }
    if opts.include_bio {
        m.push("desc", MatchOp::Ne(PLACEHOLDER.into()));
    }
    if opts.include_website_link {
        m.push("link", MatchOp::Ne(PLACEHOLDER.into()));
    }
    if !opts.include_private_accounts {
        m.push("privacy", MatchOp::Ne(PRIVATE.into()));
    }
    if let Some(email) = opts.caller_email() {
        let wanted = match exclusion {
            EmailExclusion::Always => true,
            EmailExclusion::WhenRequested => opts.exclude_exported_leads,
        };
        if wanted {
            m.push("userEmail", MatchOp::Nin(vec![email.to_string()]));
        }
    }
    m
}
