use bson::Bson;

// Safety limits to prevent resource abuse
pub const MAX_PATH_DEPTH: usize = 32;
pub(crate) const MAX_IN_SET: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gte,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    True,
    And(Vec<Filter>),
    Not(Box<Filter>),
    Nin { path: String, values: Vec<Bson> },
    Cmp { path: String, op: CmpOp, value: Bson },
}

impl Filter {
    /// `path != value`, which also holds when the path is missing.
    #[must_use]
    pub fn ne(path: &str, value: impl Into<Bson>) -> Self {
        Self::Not(Box::new(Self::Cmp { path: path.to_string(), op: CmpOp::Eq, value: value.into() }))
    }

    /// Conjunction that collapses to `True` or to its single member.
    #[must_use]
    pub fn all(mut filters: Vec<Filter>) -> Self {
        match filters.len() {
            0 => Self::True,
            1 => filters.remove(0),
            _ => Self::And(filters),
        }
    }
}
