use crate::errors::LeadsError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Terms appended to the negative keywords when `excludeSexualContent` is set.
pub const ADULT_CONTENT_TERMS: &[&str] = &[
    "onlyfans", "18+", "adult", "nude", "sex", "porn", "sexual", "exclusive content", "penis",
    "vagina", "erotica", "XXX", "fetish", "BDSM", "camgirl", "webcam", "erotic", "sexy",
    "intimate", "pornography", "striptease", "adult content", "explicit", "lust", "orgasm",
    "masturbation", "erotic videos", "nude photos", "sex tapes", "amateur porn",
    "professional porn", "kink", "adult entertainment", "sex chat", "sexual videos",
    "sexual photos", "pornographic", "sexy pictures", "sex stories", "porn stars",
    "sex workers", "escort", "dirty talk", "seductive", "sensual", "adult film", "lewd",
    "provocative", "smut", "bare", "naked", "intimate moments", "dirty pictures", "sex acts",
];

/// Search options as sent by the search page in the `filters` query parameter.
///
/// Every field is optional; `null` is treated like an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(deserialize_with = "lower_bound")]
    pub min_followers: Option<i64>,
    #[serde(deserialize_with = "upper_bound")]
    pub max_followers: Option<i64>,
    #[serde(deserialize_with = "lower_bound")]
    pub min_posts: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub positive_keywords: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub negative_keywords: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub include_profile_picture: bool,
    #[serde(deserialize_with = "null_default")]
    pub include_bio: bool,
    #[serde(deserialize_with = "null_default")]
    pub include_website_link: bool,
    #[serde(deserialize_with = "null_default")]
    pub include_private_accounts: bool,
    #[serde(deserialize_with = "null_default")]
    pub exclude_exported_leads: bool,
    #[serde(deserialize_with = "null_default")]
    pub exclude_sexual_content: bool,
    #[serde(alias = "filterInDatabase", deserialize_with = "null_default")]
    pub filter_in_mongo: bool,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
}

impl FilterOptions {
    /// Parses the raw `filters` query parameter. Absent or blank input yields the defaults.
    ///
    /// # Errors
    /// Returns `LeadsError::InvalidFilters` if the value is not a JSON filter object.
    pub fn from_query(raw: Option<&str>) -> Result<Self, LeadsError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(json) => {
                serde_json::from_str(json).map_err(|e| LeadsError::InvalidFilters(e.to_string()))
            }
        }
    }

    /// Negative keywords after the adult-content vocabulary has been appended.
    #[must_use]
    pub fn effective_negative_keywords(&self) -> Vec<String> {
        let mut out = self.negative_keywords.clone();
        if self.exclude_sexual_content {
            out.extend(ADULT_CONTENT_TERMS.iter().map(|t| (*t).to_string()));
        }
        out
    }

    /// The caller's email, if one was supplied.
    #[must_use]
    pub fn caller_email(&self) -> Option<&str> {
        let e = self.email.trim();
        if e.is_empty() { None } else { Some(e) }
    }
}

fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Which way a fractional bound is rounded. Counts are integral, so rounding a lower
/// bound up (an upper bound down) keeps exactly the same documents.
#[derive(Clone, Copy)]
enum Rounding {
    Up,
    Down,
}

struct BoundVisitor(Rounding);

impl<'de> Visitor<'de> for BoundVisitor {
    type Value = Option<i64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Option<i64>, E> {
        Ok(Some(v))
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Option<i64>, E> {
        Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
    }
    #[allow(clippy::cast_possible_truncation)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Option<i64>, E> {
        if !v.is_finite() {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        let r = match self.0 {
            Rounding::Up => v.ceil(),
            Rounding::Down => v.floor(),
        };
        // `as` saturates at the i64 range
        Ok(Some(r as i64))
    }
    fn visit_unit<E: de::Error>(self) -> Result<Option<i64>, E> {
        Ok(None)
    }
    fn visit_none<E: de::Error>(self) -> Result<Option<i64>, E> {
        Ok(None)
    }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Option<i64>, D::Error> {
        d.deserialize_any(self)
    }
}

fn lower_bound<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    d.deserialize_any(BoundVisitor(Rounding::Up))
}

fn upper_bound<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    d.deserialize_any(BoundVisitor(Rounding::Down))
}
