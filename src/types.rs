use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value scraped fields carry when the profile had nothing to offer.
pub const PLACEHOLDER: &str = "0";

/// `privacy` value of locked profiles.
pub const PRIVATE: &str = "private";

/// Fields returned to callers, in output order.
pub const OUTPUT_FIELDS: [&str; 8] =
    ["name", "desc", "email", "phone", "login", "post_cnt", "fol_cnt", "link"];

/// Fields keyword filters look at.
pub const KEYWORD_FIELDS: [&str; 3] = ["desc", "login", "name"];

/// A scraped profile as stored in the leads collection.
///
/// Decoding is lenient because scrapers wrote whatever they found: counts may be
/// int32, int64, double or numeric strings, and text fields may be numbers or null.
/// Only the eight output fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadDocument {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub desc: String,
    #[serde(default, deserialize_with = "de_text")]
    pub email: String,
    #[serde(default, deserialize_with = "de_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "de_text")]
    pub login: String,
    #[serde(default, deserialize_with = "de_count")]
    pub post_cnt: i64,
    #[serde(default, deserialize_with = "de_count")]
    pub fol_cnt: i64,
    #[serde(default, deserialize_with = "de_text")]
    pub link: String,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing)]
    pub privacy: Option<String>,
    #[serde(default, rename = "userEmail", deserialize_with = "de_opt_text", skip_serializing)]
    pub user_email: Option<String>,
}

impl LeadDocument {
    #[must_use]
    pub fn has_phone(&self) -> bool {
        self.phone != PLACEHOLDER
    }

    #[must_use]
    pub fn has_email(&self) -> bool {
        self.email != PLACEHOLDER
    }

    /// The text keyword filters are evaluated against, in `KEYWORD_FIELDS` order.
    #[must_use]
    pub fn keyword_fields(&self) -> [&str; 3] {
        [&self.desc, &self.login, &self.name]
    }

    /// Decodes a stored BSON document.
    ///
    /// # Errors
    /// Returns an error if a field has a shape no lenient rule accepts.
    pub fn from_bson(doc: &bson::Document) -> Result<Self, crate::errors::LeadsError> {
        let v = serde_json::to_value(doc)?;
        Ok(serde_json::from_value(v)?)
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }
    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }
    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
        d.deserialize_any(TextVisitor)
    }
    // nested values carry no searchable text
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(String::new())
    }
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(String::new())
    }
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, numeric string or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        Ok(i64::try_from(v).unwrap_or(i64::MAX))
    }
    #[allow(clippy::cast_possible_truncation)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        Ok(if v.is_finite() { v as i64 } else { 0 })
    }
    #[allow(clippy::cast_possible_truncation)]
    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let t = v.trim();
        if let Ok(n) = t.parse::<i64>() {
            return Ok(n);
        }
        match t.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(f as i64),
            _ => Ok(0),
        }
    }
    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<i64, D::Error> {
        d.deserialize_any(CountVisitor)
    }
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    d.deserialize_any(TextVisitor)
}

fn de_count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(CountVisitor)
}

fn de_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Some(d.deserialize_any(TextVisitor)?))
}
