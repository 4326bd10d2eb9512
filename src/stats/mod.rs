//! Dashboard statistics snapshot
//!
//! Aggregates are computed server-side; the client treats them as a
//! read-only snapshot and re-fetches after lead mutations.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::context::ResourceContext;
use crate::error::Error;
use crate::fetch::Fetch;

/// Server-side lead aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_leads: u64,
    pub active_leads: u64,
    pub converted_leads: u64,
    pub dnp_leads: u64,
}

/// Client for the dashboard statistics snapshot
pub struct StatsClient {
    url: String,
    client: Client,
    auth: Arc<Auth>,
    options: ClientOptions,
    snapshot: Arc<RwLock<Option<DashboardStats>>>,
}

impl StatsClient {
    /// Create a new StatsClient
    pub(crate) fn new(url: &str, client: Client, auth: Arc<Auth>, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            auth,
            options,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the cached snapshot with the server's current aggregates
    pub async fn fetch_all(&self) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let url = format!("{}/admin/dashboard-stats/", self.url);

        let stats = Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .execute::<DashboardStats>()
            .await?;

        let mut snapshot = self.snapshot.write().unwrap();
        *snapshot = Some(stats);
        Ok(())
    }

    /// The cached snapshot, if one has been fetched
    pub fn snapshot(&self) -> Option<DashboardStats> {
        *self.snapshot.read().unwrap()
    }
}

#[async_trait]
impl ResourceContext for StatsClient {
    async fn refresh(&self) -> Result<(), Error> {
        self.fetch_all().await
    }

    fn invalidate(&self) {
        *self.snapshot.write().unwrap() = None;
    }
}
