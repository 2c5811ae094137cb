use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, MAX_IN_SET, MAX_PATH_DEPTH};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Not(f) => !eval_filter(doc, f),
        Filter::Nin { path, values } => !get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        Filter::Cmp { path, op, value } => {
            let Some(v) = get_path(doc, path) else { return false };
            match op {
                CmpOp::Eq => bson_equal(v, value),
                // range operators only match within the same type bracket
                CmpOp::Gte => compare_bson(v, value).is_some_and(Ordering::is_ge),
                CmpOp::Lte => compare_bson(v, value).is_some_and(Ordering::is_le),
            }
        }
    }
}

fn is_in_set(v: &Bson, set: &[Bson]) -> bool {
    set.iter().take(MAX_IN_SET).any(|x| bson_equal(v, x))
}

fn bson_equal(a: &Bson, b: &Bson) -> bool {
    match compare_bson(a, b) {
        Some(o) => o == Ordering::Equal,
        None => a == b,
    }
}

fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let mut cur = doc;
    let mut parts = path.split('.').peekable();
    let mut segs = 0usize;
    while let Some(part) = parts.next() {
        segs += 1;
        if segs > MAX_PATH_DEPTH {
            return None;
        }
        let v = cur.get(part)?;
        if parts.peek().is_none() {
            return Some(v);
        }
        match v {
            Bson::Document(d) => cur = d,
            _ => return None,
        }
    }
    None
}

/// Orders two values of the same comparison bracket: numbers of any width, strings, booleans.
/// Returns `None` across brackets.
#[must_use]
pub fn compare_bson(a: &Bson, b: &Bson) -> Option<Ordering> {
    use bson::Bson as T;
    #[allow(clippy::cast_precision_loss)]
    fn as_f64_num(x: &T) -> Option<f64> {
        match x {
            T::Int32(i) => Some(f64::from(*i)),
            T::Int64(i) => Some(*i as f64),
            T::Double(f) => Some(*f),
            _ => None,
        }
    }
    match (a, b) {
        (T::Int32(x), T::Int32(y)) => Some(x.cmp(y)),
        (T::Int64(x), T::Int64(y)) => Some(x.cmp(y)),
        (T::Int32(x), T::Int64(y)) => Some(i64::from(*x).cmp(y)),
        (T::Int64(x), T::Int32(y)) => Some(x.cmp(&i64::from(*y))),
        (T::String(x), T::String(y)) => Some(x.cmp(y)),
        (T::Boolean(x), T::Boolean(y)) => Some(x.cmp(y)),
        _ => match (as_f64_num(a), as_f64_num(b)) {
            (Some(x), Some(y)) => Some(x.total_cmp(&y)),
            _ => None,
        },
    }
}

/// Keeps only `fields`, in the order given.
#[must_use]
pub fn project_fields(doc: &BsonDocument, fields: &[&str]) -> BsonDocument {
    let mut out = BsonDocument::new();
    for f in fields {
        if let Some(v) = doc.get(*f) {
            out.insert(*f, v.clone());
        }
    }
    out
}
