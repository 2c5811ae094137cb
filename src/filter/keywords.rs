use crate::errors::LeadsError;
use crate::types::LeadDocument;
use regex::{Regex, RegexBuilder};

// Keeps a hostile keyword list from compiling into an unbounded automaton.
const MAX_REGEX_SIZE: usize = 10 * (1 << 20);

/// A keyword list matched as a case-insensitive alternation of literal terms.
///
/// Terms are escaped before they are joined, so `18+` or `c++` match literally.
/// Blank entries are dropped. An empty set matches nothing.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: Vec<String>,
    re: Option<Regex>,
}

impl KeywordSet {
    /// # Errors
    /// Returns `LeadsError::InvalidFilters` if the combined pattern is too large to compile.
    pub fn new<I, S>(terms: I) -> Result<Self, LeadsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !t.trim().is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(Self { terms, re: None });
        }
        let pattern = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|e| LeadsError::InvalidFilters(format!("keyword list: {e}")))?;
        Ok(Self { terms, re: Some(re) })
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.re.as_ref().is_some_and(|r| r.is_match(text))
    }

    #[must_use]
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| self.is_match(f))
    }

    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// In-process keyword filter over `desc`, `login` and `name`.
///
/// Negative terms exclude on any hit. Otherwise a document needs at least one
/// positive hit, so an empty positive list rejects every document.
#[derive(Debug, Clone)]
pub struct KeywordPredicate {
    positive: KeywordSet,
    negative: KeywordSet,
}

impl KeywordPredicate {
    /// # Errors
    /// Propagates `KeywordSet::new` failures.
    pub fn new<S: AsRef<str>>(positive: &[S], negative: &[S]) -> Result<Self, LeadsError> {
        Ok(Self { positive: KeywordSet::new(positive)?, negative: KeywordSet::new(negative)? })
    }

    #[must_use]
    pub fn positive(&self) -> &KeywordSet {
        &self.positive
    }

    #[must_use]
    pub fn negative(&self) -> &KeywordSet {
        &self.negative
    }

    #[must_use]
    pub fn is_filtered_out(&self, doc: &LeadDocument) -> bool {
        let fields = doc.keyword_fields();
        if self.negative.matches_any(&fields) {
            return true;
        }
        !self.positive.matches_any(&fields)
    }

    #[must_use]
    pub fn accepts(&self, doc: &LeadDocument) -> bool {
        !self.is_filtered_out(doc)
    }
}
