use crate::config::{StoreConfig, redact_uri};
use crate::errors::LeadsError;
use crate::filter::Pipeline;
use crate::types::LeadDocument;
use mongodb::options::ClientOptions;
use mongodb::{Client, Cursor};
use tokio::sync::OnceCell;

use super::{LeadCursor, LeadStore};

/// The leads collection in MongoDB (Atlas for `$search`).
///
/// The client is created by the first aggregation and reused for the life of the
/// store; the driver pools connections behind it.
pub struct MongoStore {
    uri: String,
    database: String,
    collection: String,
    app_name: String,
    client: OnceCell<Client>,
}

impl MongoStore {
    #[must_use]
    pub fn new(cfg: &StoreConfig) -> Self {
        Self {
            uri: cfg.uri.clone(),
            database: cfg.database.clone(),
            collection: cfg.collection.clone(),
            app_name: cfg.app_name.clone(),
            client: OnceCell::new(),
        }
    }

    /// The pipeline's stages as driver documents; the crate's bson and the driver's
    /// are separate versions.
    fn driver_stages(pipeline: &Pipeline) -> Result<Vec<mongodb::bson::Document>, LeadsError> {
        pipeline
            .to_documents()
            .iter()
            .map(|d| mongodb::bson::to_document(d).map_err(|e| LeadsError::Bson(e.to_string())))
            .collect()
    }

    async fn client(&self) -> Result<&Client, LeadsError> {
        self.client
            .get_or_try_init(|| async {
                log::info!("connecting to {}", redact_uri(&self.uri));
                let mut opts = ClientOptions::parse(&self.uri).await?;
                opts.app_name = Some(self.app_name.clone());
                Ok::<Client, LeadsError>(Client::with_options(opts)?)
            })
            .await
    }
}

impl LeadStore for MongoStore {
    type Cursor = MongoCursor;

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<MongoCursor, LeadsError> {
        let stages = Self::driver_stages(pipeline)?;
        let client = self.client().await?;
        let coll = client
            .database(&self.database)
            .collection::<mongodb::bson::Document>(&self.collection);
        let cursor = coll.aggregate(stages).await?;
        Ok(MongoCursor { inner: cursor.with_type::<LeadDocument>() })
    }

    fn describe(&self) -> String {
        format!("mongodb {} {}.{}", redact_uri(&self.uri), self.database, self.collection)
    }
}

pub struct MongoCursor {
    inner: Cursor<LeadDocument>,
}

impl LeadCursor for MongoCursor {
    async fn next_lead(&mut self) -> Result<Option<LeadDocument>, LeadsError> {
        if !self.inner.advance().await? {
            return Ok(None);
        }
        Ok(Some(self.inner.deserialize_current()?))
    }
}
