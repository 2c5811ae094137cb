use crate::errors::LeadsError;
use crate::filter::{KeywordPredicate, MatchOp, MatchStage, Pipeline};
use crate::query::{CmpOp, Filter, eval_filter, project_fields};
use crate::types::LeadDocument;
use bson::{Bson, Document as BsonDocument};
use parking_lot::RwLock;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::{LeadCursor, LeadStore};

/// An in-process leads collection.
///
/// `$match`, `$limit` and `$project` behave as in the aggregation framework. `$search`
/// is approximated with the keyword predicate: case-insensitive substring hits on
/// `desc`, `login` and `name`, where Atlas would match analyzed tokens.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<BsonDocument>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_documents(docs: Vec<BsonDocument>) -> Self {
        Self { docs: RwLock::new(docs) }
    }

    pub fn insert(&self, doc: BsonDocument) {
        self.docs.write().push(doc);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Loads a JSON array or NDJSON file of lead documents.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a record is not a JSON object.
    pub fn load_file(path: &Path) -> Result<Self, LeadsError> {
        let file = std::fs::File::open(path)?;
        let store = Self::new();
        let n = store.load_reader(file)?;
        log::info!("loaded {} leads from {}", n, path.display());
        Ok(store)
    }

    /// Appends documents read from `reader`; returns how many were added.
    /// Input starting with `[` is read as one JSON array, anything else as NDJSON.
    ///
    /// # Errors
    /// Returns an error on I/O failure or on the first malformed record.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<usize, LeadsError> {
        let mut reader = BufReader::new(reader);
        let array_mode = loop {
            let buf = reader.fill_buf()?;
            match buf.iter().position(|b| !b.is_ascii_whitespace()) {
                Some(i) => {
                    let first = buf[i];
                    reader.consume(i);
                    break first == b'[';
                }
                None if buf.is_empty() => return Ok(0),
                None => {
                    let n = buf.len();
                    reader.consume(n);
                }
            }
        };
        if array_mode {
            let docs: Vec<BsonDocument> = serde_json::from_reader(reader)?;
            let n = docs.len();
            self.docs.write().extend(docs);
            return Ok(n);
        }
        let mut added = 0usize;
        let mut line_no = 0usize;
        let mut buf = String::with_capacity(8 * 1024);
        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let line = buf.trim();
            if line.is_empty() {
                continue;
            }
            let doc: BsonDocument = serde_json::from_str(line)
                .map_err(|e| LeadsError::Bson(format!("line {line_no}: {e}")))?;
            self.docs.write().push(doc);
            added += 1;
            if added % 10_000 == 0 {
                log::info!("loaded {added} leads (ndjson)");
            }
        }
        Ok(added)
    }

    fn run(&self, pipeline: &Pipeline) -> Result<Vec<LeadDocument>, LeadsError> {
        let filter = match_filter(&pipeline.matcher);
        let search = match &pipeline.search {
            Some(s) => Some(KeywordPredicate::new(s.should.as_slice(), s.must_not.as_slice())?),
            None => None,
        };
        let docs = self.docs.read();
        let mut out = Vec::new();
        for d in docs.iter() {
            if out.len() >= pipeline.limit {
                break;
            }
            if let Some(p) = &search
                && !p.accepts(&LeadDocument::from_bson(d)?)
            {
                continue;
            }
            if !eval_filter(d, &filter) {
                continue;
            }
            out.push(LeadDocument::from_bson(&project_fields(d, &pipeline.projection))?);
        }
        Ok(out)
    }
}

/// Translates a `$match` stage into the embedded evaluator's filter.
#[must_use]
pub fn match_filter(stage: &MatchStage) -> Filter {
    let mut parts = Vec::new();
    for c in &stage.conditions {
        for op in &c.ops {
            parts.push(match op {
                MatchOp::Gte(n) => Filter::Cmp { path: c.field.into(), op: CmpOp::Gte, value: Bson::Int64(*n) },
                MatchOp::Lte(n) => Filter::Cmp { path: c.field.into(), op: CmpOp::Lte, value: Bson::Int64(*n) },
                MatchOp::Ne(s) => Filter::ne(c.field, s.as_str()),
                MatchOp::Nin(v) => Filter::Nin {
                    path: c.field.into(),
                    values: v.iter().cloned().map(Bson::String).collect(),
                },
            });
        }
    }
    Filter::all(parts)
}

impl LeadStore for MemoryStore {
    type Cursor = MemoryCursor;

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<MemoryCursor, LeadsError> {
        Ok(MemoryCursor { inner: self.run(pipeline)?.into_iter() })
    }

    fn describe(&self) -> String {
        format!("memory ({} documents)", self.len())
    }
}

pub struct MemoryCursor {
    inner: std::vec::IntoIter<LeadDocument>,
}

impl LeadCursor for MemoryCursor {
    async fn next_lead(&mut self) -> Result<Option<LeadDocument>, LeadsError> {
        Ok(self.inner.next())
    }
}
