//! Turns a cursor of candidate leads into the response payload.

use crate::errors::LeadsError;
use crate::filter::KeywordPredicate;
use crate::store::LeadCursor;
use crate::types::LeadDocument;
use serde::{Deserialize, Serialize};

/// Matched leads in cursor order, with contact counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub results: Vec<LeadDocument>,
    /// Leads whose phone is not the placeholder.
    pub phone_count: u64,
    /// Leads whose email is not the placeholder.
    pub email_count: u64,
}

impl ResultSet {
    /// Records `doc` as matched.
    pub fn push(&mut self, doc: LeadDocument) {
        if doc.has_phone() {
            self.phone_count += 1;
        }
        if doc.has_email() {
            self.email_count += 1;
        }
        self.results.push(doc);
    }

    #[must_use]
    pub fn matched(&self) -> usize {
        self.results.len()
    }
}

/// Drains `cursor`, keeping what `predicate` accepts (everything when `None`).
///
/// # Errors
/// The first cursor error aborts assembly; nothing gathered so far is returned.
pub async fn assemble<C: LeadCursor>(
    cursor: &mut C,
    predicate: Option<&KeywordPredicate>,
) -> Result<ResultSet, LeadsError> {
    let mut out = ResultSet::default();
    let mut scanned = 0u64;
    while let Some(doc) = cursor.next_lead().await? {
        scanned += 1;
        if predicate.is_none_or(|p| p.accepts(&doc)) {
            out.push(doc);
        }
    }
    log::debug!("assembled {} of {} scanned leads", out.matched(), scanned);
    Ok(out)
}

/// Synchronous variant of [`assemble`] over any fallible iterator.
///
/// # Errors
/// Returns the first error the iterator yields.
pub fn assemble_iter<I>(docs: I, predicate: Option<&KeywordPredicate>) -> Result<ResultSet, LeadsError>
where
    I: IntoIterator<Item = Result<LeadDocument, LeadsError>>,
{
    let mut out = ResultSet::default();
    for doc in docs {
        let doc = doc?;
        if predicate.is_none_or(|p| p.accepts(&doc)) {
            out.push(doc);
        }
    }
    Ok(out)
}
