use bson::{Document, doc};
use leadsift::errors::LeadsError;
use leadsift::filter::{EmailExclusion, FilterOptions, Pipeline};
use leadsift::search::LeadSearch;
use leadsift::store::{LeadCursor, LeadStore, MemoryStore};
use leadsift::types::LeadDocument;

/// The profile from the food/chef scenario; matches the scenario's bounds and keywords.
pub fn chef() -> Document {
    doc! {
        "name": "Chef Joe",
        "desc": "I love food",
        "email": "0",
        "phone": "+1 555 0100",
        "login": "chef",
        "post_cnt": 20,
        "fol_cnt": 2000,
        "link": "0",
    }
}

pub fn scenario_options() -> FilterOptions {
    FilterOptions {
        min_followers: Some(1000),
        max_followers: Some(5000),
        min_posts: Some(10),
        positive_keywords: vec!["food".into()],
        negative_keywords: vec!["porn".into()],
        ..Default::default()
    }
}

/// A small mixed collection covering every filter dimension.
pub fn leads() -> Vec<Document> {
    vec![
        chef(),
        doc! { "name": "Dana", "desc": "food blogger", "email": "dana@mail.io", "phone": "0", "login": "dana_eats",
               "post_cnt": 400, "fol_cnt": 4200, "link": "https://dana.io", "avatar": "d.jpg", "privacy": "public" },
        doc! { "name": "Priv", "desc": "secret food", "email": "p@mail.io", "phone": "1", "login": "priv",
               "post_cnt": 40, "fol_cnt": 3000, "link": "0", "avatar": "p.jpg", "privacy": "private" },
        doc! { "name": "Mine", "desc": "my own food page", "email": "m@mail.io", "phone": "2", "login": "mine",
               "post_cnt": 40, "fol_cnt": 3000, "link": "0", "avatar": "0", "userEmail": "owner@leads.io" },
        doc! { "name": "Racer", "desc": "cars and speed", "email": "r@mail.io", "phone": "3", "login": "racer",
               "post_cnt": 80, "fol_cnt": 2500, "link": "https://r.io", "avatar": "r.jpg" },
        doc! { "name": "Lewd", "desc": "food and onlyfans", "email": "0", "phone": "0", "login": "lewd",
               "post_cnt": 90, "fol_cnt": 2600, "link": "0", "avatar": "l.jpg" },
        doc! { "name": "Tiny", "desc": "food", "email": "0", "phone": "0", "login": "tiny",
               "post_cnt": 1, "fol_cnt": 12, "link": "0" },
        doc! { "name": "Stringy", "desc": "street food", "email": "s@mail.io", "phone": "4", "login": "stringy",
               "post_cnt": "55", "fol_cnt": 1500.0, "link": "0" },
    ]
}

pub fn memory_search(exclusion: EmailExclusion) -> LeadSearch<MemoryStore> {
    LeadSearch::new(MemoryStore::from_documents(leads()), exclusion)
}

pub fn logins(docs: &[LeadDocument]) -> Vec<&str> {
    docs.iter().map(|d| d.login.as_str()).collect()
}

/// Fails every aggregation, like an unreachable database.
pub struct FailingStore;

impl LeadStore for FailingStore {
    type Cursor = FlakyCursor;

    async fn aggregate(&self, _pipeline: &Pipeline) -> Result<FlakyCursor, LeadsError> {
        Err(LeadsError::Store("connection refused: mongodb://admin:hunter2@db".into()))
    }

    fn describe(&self) -> String {
        "failing".into()
    }
}

/// Yields its documents, then an error instead of end-of-stream.
pub struct FlakyStore(pub Vec<LeadDocument>);

impl LeadStore for FlakyStore {
    type Cursor = FlakyCursor;

    async fn aggregate(&self, _pipeline: &Pipeline) -> Result<FlakyCursor, LeadsError> {
        Ok(FlakyCursor { docs: self.0.clone().into_iter() })
    }

    fn describe(&self) -> String {
        "flaky".into()
    }
}

pub struct FlakyCursor {
    docs: std::vec::IntoIter<LeadDocument>,
}

impl LeadCursor for FlakyCursor {
    async fn next_lead(&mut self) -> Result<Option<LeadDocument>, LeadsError> {
        match self.docs.next() {
            Some(d) => Ok(Some(d)),
            None => Err(LeadsError::Store("cursor killed".into())),
        }
    }
}
