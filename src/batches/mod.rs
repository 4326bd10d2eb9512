//! Course batch collection and creation
//!
//! Batches are the cohorts converted leads are assigned to. Admin reads and
//! writes through the admin endpoint; every other role gets the read-only
//! general listing. Creation follows refetch-after-write like every other
//! mutation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::auth::{Auth, Role};
use crate::config::ClientOptions;
use crate::context::ResourceContext;
use crate::error::Error;
use crate::fetch::Fetch;

/// Batch lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Active,
    Completed,
}

/// A course cohort with pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub book_price: f64,
    pub status: BatchStatus,
}

/// Payload for creating a batch
#[derive(Debug, Clone, Serialize)]
pub struct NewBatch {
    pub name: String,
    pub price: f64,
    pub book_price: f64,
    pub status: BatchStatus,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchListResponse {
    Wrapped { batches: Vec<Batch> },
    Bare(Vec<Batch>),
}

impl BatchListResponse {
    fn into_batches(self) -> Vec<Batch> {
        match self {
            BatchListResponse::Wrapped { batches } => batches,
            BatchListResponse::Bare(batches) => batches,
        }
    }
}

/// Client for the batch resource family
pub struct BatchesClient {
    url: String,
    client: Client,
    auth: Arc<Auth>,
    options: ClientOptions,
    collection: Arc<RwLock<Vec<Batch>>>,
}

impl BatchesClient {
    /// Create a new BatchesClient
    pub(crate) fn new(url: &str, client: Client, auth: Arc<Auth>, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            auth,
            options,
            collection: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn list_path(role: Role) -> &'static str {
        match role {
            Role::Admin => "/admin/batch/",
            Role::Sales | Role::Operations | Role::Accounts => "/gen/batch/",
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Replace the cached collection with the server's current snapshot
    pub async fn fetch_all(&self) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let role = self.auth.require_role()?;
        let url = self.endpoint(Self::list_path(role));

        let batches = Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .execute::<BatchListResponse>()
            .await?
            .into_batches();

        debug!(count = batches.len(), "batch collection replaced");
        let mut collection = self.collection.write().unwrap();
        *collection = batches;
        Ok(())
    }

    /// A copy of the cached collection
    pub fn snapshot(&self) -> Vec<Batch> {
        self.collection.read().unwrap().clone()
    }

    /// Look up a cached batch by id
    pub fn get(&self, id: i64) -> Option<Batch> {
        self.collection
            .read()
            .unwrap()
            .iter()
            .find(|batch| batch.id == id)
            .cloned()
    }

    /// Create a batch (admin), then refetch the collection
    pub async fn create(&self, batch: NewBatch) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let url = self.endpoint("/admin/batch/");

        Fetch::post(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .json(&batch)?
            .send()
            .await?;

        self.fetch_all().await
    }
}

#[async_trait]
impl ResourceContext for BatchesClient {
    async fn refresh(&self) -> Result<(), Error> {
        self.fetch_all().await
    }

    fn invalidate(&self) {
        self.collection.write().unwrap().clear();
    }
}
