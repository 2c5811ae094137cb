use crate::types::{KEYWORD_FIELDS, OUTPUT_FIELDS};
use bson::{Bson, Document, doc};

/// Atlas Search index the `$search` stage targets.
pub const SEARCH_INDEX: &str = "default";

/// Result cap when keywords are filtered by the store.
pub const DATABASE_SIDE_LIMIT: usize = 30_000;
/// Result cap when keywords are filtered after retrieval.
pub const APPLICATION_SIDE_LIMIT: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOp {
    Gte(i64),
    Lte(i64),
    Ne(String),
    Nin(Vec<String>),
}

impl MatchOp {
    fn key(&self) -> &'static str {
        match self {
            Self::Gte(_) => "$gte",
            Self::Lte(_) => "$lte",
            Self::Ne(_) => "$ne",
            Self::Nin(_) => "$nin",
        }
    }

    fn value(&self) -> Bson {
        match self {
            Self::Gte(n) | Self::Lte(n) => Bson::Int64(*n),
            Self::Ne(s) => Bson::String(s.clone()),
            Self::Nin(v) => Bson::Array(v.iter().cloned().map(Bson::String).collect()),
        }
    }
}

/// All operators applied to one field; they must all hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCondition {
    pub field: &'static str,
    pub ops: Vec<MatchOp>,
}

/// The `$match` stage: a conjunction of field conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStage {
    pub conditions: Vec<FieldCondition>,
}

impl MatchStage {
    /// Adds `op` on `field`, merging with an existing condition on the same field.
    /// An operator of the same kind replaces the earlier one.
    pub fn push(&mut self, field: &'static str, op: MatchOp) {
        if let Some(c) = self.conditions.iter_mut().find(|c| c.field == field) {
            if let Some(slot) = c.ops.iter_mut().find(|o| o.key() == op.key()) {
                *slot = op;
            } else {
                c.ops.push(op);
            }
            return;
        }
        self.conditions.push(FieldCondition { field, ops: vec![op] });
    }

    #[must_use]
    pub fn condition(&self, field: &str) -> Option<&FieldCondition> {
        self.conditions.iter().find(|c| c.field == field)
    }

    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut out = Document::new();
        for c in &self.conditions {
            let mut ops = Document::new();
            for op in &c.ops {
                ops.insert(op.key(), op.value());
            }
            out.insert(c.field, ops);
        }
        out
    }
}

/// The Atlas `$search` stage scoring positive keywords and excluding negative ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStage {
    pub index: String,
    pub should: Vec<String>,
    pub must_not: Vec<String>,
}

impl SearchStage {
    #[must_use]
    pub fn to_document(&self) -> Document {
        let clause = |q: &String| {
            Bson::Document(doc! { "text": { "query": q.as_str(), "path": KEYWORD_FIELDS.to_vec() } })
        };
        let mut compound = Document::new();
        if !self.should.is_empty() {
            compound.insert("should", self.should.iter().map(clause).collect::<Vec<_>>());
        }
        if !self.must_not.is_empty() {
            compound.insert("mustNot", self.must_not.iter().map(clause).collect::<Vec<_>>());
        }
        doc! { "$search": { "index": self.index.as_str(), "compound": compound } }
    }
}

/// A compiled aggregation: optional `$search`, then `$match`, `$limit` and `$project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub search: Option<SearchStage>,
    pub matcher: MatchStage,
    pub limit: usize,
    pub projection: Vec<&'static str>,
}

impl Pipeline {
    #[must_use]
    pub fn new(search: Option<SearchStage>, matcher: MatchStage, limit: usize) -> Self {
        Self { search, matcher, limit, projection: OUTPUT_FIELDS.to_vec() }
    }

    /// Stage documents in the shape the aggregation framework expects.
    #[must_use]
    pub fn to_documents(&self) -> Vec<Document> {
        let mut stages = Vec::with_capacity(4);
        if let Some(s) = &self.search {
            stages.push(s.to_document());
        }
        stages.push(doc! { "$match": self.matcher.to_document() });
        stages.push(doc! { "$limit": i64::try_from(self.limit).unwrap_or(i64::MAX) });
        let mut project = doc! { "_id": 0 };
        for f in &self.projection {
            project.insert(*f, 1);
        }
        stages.push(doc! { "$project": project });
        stages
    }

    /// The pipeline rendered as JSON, for logs and the `pipeline` command.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.to_documents()
                .into_iter()
                .map(|d| Bson::Document(d).into_relaxed_extjson())
                .collect(),
        )
    }
}
