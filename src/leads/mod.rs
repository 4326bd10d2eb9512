//! Role-scoped lead collection and mutations
//!
//! The same `Lead` entity is served through different endpoints depending
//! on the session role: admin sees the full book, sales sees only assigned
//! leads, operations and accounts see the under-review subset. Every
//! mutation follows refetch-after-write — the PATCH response is awaited,
//! then the whole collection is fetched again, so the cache never drifts
//! from server state.

mod types;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::auth::{Auth, Role};
use crate::config::ClientOptions;
use crate::context::ResourceContext;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::proof::ProofField;

pub use types::*;

/// Lead list responses come back either as a bare array or wrapped in a
/// `leads` object, depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum LeadListResponse {
    Wrapped { leads: Vec<Lead> },
    Bare(Vec<Lead>),
}

impl LeadListResponse {
    fn into_leads(self) -> Vec<Lead> {
        match self {
            LeadListResponse::Wrapped { leads } => leads,
            LeadListResponse::Bare(leads) => leads,
        }
    }
}

/// Client for the lead resource family
pub struct LeadsClient {
    /// The base URL for the MariCRM API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Session and role source
    auth: Arc<Auth>,

    /// Client options
    options: ClientOptions,

    /// Cached collection, in server response order
    collection: Arc<RwLock<Vec<Lead>>>,
}

impl LeadsClient {
    /// Create a new LeadsClient
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
            Role::Admin => "/admin/leads/",
            Role::Sales => "/sales/leads/",
            Role::Operations | Role::Accounts => "/gen/under-review-leads/",
        }
    }

    fn patch_path(role: Role) -> &'static str {
        match role {
            Role::Admin => "/admin/leads/",
            Role::Sales => "/sales/leads/",
            Role::Accounts => "/accounts/lead/",
            Role::Operations => "/ops/lead/",
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Replace the cached collection with the server's current snapshot
    /// for the session role
    pub async fn fetch_all(&self) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let role = self.auth.require_role()?;
        let url = self.endpoint(Self::list_path(role));

        let leads = Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .execute::<LeadListResponse>()
            .await?
            .into_leads();

        debug!(role = role.as_str(), count = leads.len(), "lead collection replaced");
        let mut collection = self.collection.write().unwrap();
        *collection = leads;
        Ok(())
    }

    /// A copy of the cached collection, in server response order
    pub fn snapshot(&self) -> Vec<Lead> {
        self.collection.read().unwrap().clone()
    }

    /// Look up a cached lead by id
    pub fn get(&self, id: i64) -> Option<Lead> {
        self.collection
            .read()
            .unwrap()
            .iter()
            .find(|lead| lead.id == id)
            .cloned()
    }

    /// Send a partial update through the role's patch endpoint, then
    /// refetch the collection
    async fn patch(&self, body: serde_json::Value) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let role = self.auth.require_role()?;
        let url = self.endpoint(Self::patch_path(role));

        Fetch::patch(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .json(&body)?
            .send()
            .await?;

        self.fetch_all().await
    }

    /// Set a lead's lifecycle status.
    ///
    /// Any status may be submitted; the backend decides whether the
    /// transition is legal.
    pub async fn update_status(&self, lead_id: i64, status: LeadStatus) -> Result<(), Error> {
        self.patch(json!({ "id": lead_id, "status": status })).await
    }

    /// Assign a lead to a sales employee
    pub async fn assign(&self, lead_id: i64, employee_id: i64) -> Result<(), Error> {
        self.patch(json!({ "id": lead_id, "assigned_to": employee_id }))
            .await
    }

    /// Update the sale-side details of a lead
    pub async fn update_sale_details(
        &self,
        lead_id: i64,
        patch: SaleDetailsPatch,
    ) -> Result<(), Error> {
        let mut body = serde_json::to_value(&patch)?;
        if let serde_json::Value::Object(ref mut map) = body {
            map.insert("id".to_string(), json!(lead_id));
        }
        self.patch(body).await
    }

    /// Record the accounts team's verdict on a lead's payment proof
    pub async fn set_payment_verification(
        &self,
        lead_id: i64,
        verdict: PaymentVerification,
    ) -> Result<(), Error> {
        self.patch(json!({ "id": lead_id, "payment_verification_status": verdict }))
            .await
    }

    /// Mark whether the student was added to the cohort group
    pub async fn set_added_to_group(&self, lead_id: i64, added: bool) -> Result<(), Error> {
        self.patch(json!({ "id": lead_id, "added_to_group": added }))
            .await
    }

    /// Mark whether the student registered on the app
    pub async fn set_registered_on_app(&self, lead_id: i64, registered: bool) -> Result<(), Error> {
        self.patch(json!({ "id": lead_id, "registered_on_app": registered }))
            .await
    }

    /// Upload a proof file for a lead.
    ///
    /// Sent as multipart through the role's patch endpoint: an `id` text
    /// part plus the file under the proof field's wire name.
    pub async fn upload_proof(
        &self,
        lead_id: i64,
        field: ProofField,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let role = self.auth.require_role()?;
        let url = self.endpoint(Self::patch_path(role));

        let form = multipart::Form::new()
            .text("id", lead_id.to_string())
            .part(
                field.as_str(),
                multipart::Part::bytes(bytes).file_name(filename.to_string()),
            );

        Fetch::patch(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .multipart(form)
            .send()
            .await?;

        self.fetch_all().await
    }

    /// Bulk-import leads from a CSV/XLSX export (admin).
    ///
    /// The file goes up as a single multipart `file` part; the collection
    /// is refetched afterwards so the imported leads appear in the cache.
    pub async fn import_file(&self, filename: &str, bytes: Vec<u8>) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let url = self.endpoint("/admin/leads/");

        let form = multipart::Form::new().part(
            "file",
            multipart::Part::bytes(bytes).file_name(filename.to_string()),
        );

        Fetch::post(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .multipart(form)
            .send()
            .await?;

        self.fetch_all().await
    }
}

#[async_trait]
impl ResourceContext for LeadsClient {
    async fn refresh(&self) -> Result<(), Error> {
        self.fetch_all().await
    }

    fn invalidate(&self) {
        self.collection.write().unwrap().clear();
    }
}
