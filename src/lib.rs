//! MariCRM Rust Client Library
//!
//! A typed async client for the MariCRM maritime-education lead management
//! API: session handling, role-scoped resource collections for leads,
//! batches, employees and dashboard stats, and proof artifact download.
//!
//! ```no_run
//! use maricrm::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let crm = MariCrm::new("http://localhost:8000/api")?;
//!
//!     let session = crm.auth().login("admin@example.com", "password").await?;
//!     println!("landing on {}", session.role.landing_path());
//!
//!     crm.leads().fetch_all().await?;
//!     for lead in crm.leads().snapshot() {
//!         println!("{} [{}]", lead.name, lead.status.as_str());
//!     }
//!
//!     crm.logout()?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod batches;
pub mod config;
pub mod context;
pub mod employees;
pub mod error;
pub mod fetch;
pub mod leads;
pub mod proof;
pub mod stats;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::Auth;
use crate::batches::BatchesClient;
use crate::config::ClientOptions;
use crate::context::ResourceContext;
use crate::employees::EmployeesClient;
use crate::error::Error;
use crate::leads::LeadsClient;
use crate::proof::ProofClient;
use crate::stats::StatsClient;

/// The main entry point for the MariCRM client.
///
/// Owns one session and one cached collection per resource family; logout
/// invalidates all of them.
pub struct MariCrm {
    /// The base URL for the MariCRM API
    pub url: String,

    /// HTTP client used for requests
    pub http_client: Client,

    /// Auth client for session management
    auth: Arc<Auth>,

    /// Client options
    pub options: ClientOptions,

    leads: Arc<LeadsClient>,
    batches: Arc<BatchesClient>,
    employees: Arc<EmployeesClient>,
    stats: Arc<StatsClient>,
    proofs: Arc<ProofClient>,

    /// Every context whose cache is dropped on logout
    contexts: Vec<Arc<dyn ResourceContext>>,
}

impl MariCrm {
    /// Create a new MariCRM client with default options
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new MariCRM client with custom options
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Arc::new(Auth::new(base_url, http_client.clone(), options.clone()));

        let leads = Arc::new(LeadsClient::new(
            base_url,
            http_client.clone(),
            auth.clone(),
            options.clone(),
        ));
        let batches = Arc::new(BatchesClient::new(
            base_url,
            http_client.clone(),
            auth.clone(),
            options.clone(),
        ));
        let employees = Arc::new(EmployeesClient::new(
            base_url,
            http_client.clone(),
            auth.clone(),
            options.clone(),
        ));
        let stats = Arc::new(StatsClient::new(
            base_url,
            http_client.clone(),
            auth.clone(),
            options.clone(),
        ));
        let proofs = Arc::new(ProofClient::new(
            base_url,
            http_client.clone(),
            auth.clone(),
            options.clone(),
        ));

        let contexts: Vec<Arc<dyn ResourceContext>> = vec![
            leads.clone(),
            batches.clone(),
            employees.clone(),
            stats.clone(),
        ];

        Ok(Self {
            url: base_url.trim_end_matches('/').to_string(),
            http_client,
            auth,
            options,
            leads,
            batches,
            employees,
            stats,
            proofs,
            contexts,
        })
    }

    /// The auth client for login, register and session access
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Restore a persisted session from disk, if one exists
    pub fn restore_session(&self) -> Result<Option<auth::Session>, Error> {
        self.auth.restore_session()
    }

    /// Sign out: clears the session (memory and disk) and drops every
    /// cached collection. Idempotent.
    pub fn logout(&self) -> Result<(), Error> {
        self.auth.logout()?;
        for context in &self.contexts {
            context.invalidate();
        }
        Ok(())
    }

    /// Refresh every cached collection from the server.
    ///
    /// What the admin dashboard does right after sign-in; non-admin roles
    /// should refresh the individual contexts their pages use instead,
    /// since some of these endpoints are admin-only.
    pub async fn refresh_all(&self) -> Result<(), Error> {
        for context in &self.contexts {
            context.refresh().await?;
        }
        Ok(())
    }

    /// The role-scoped lead context
    pub fn leads(&self) -> &LeadsClient {
        &self.leads
    }

    /// The batch context
    pub fn batches(&self) -> &BatchesClient {
        &self.batches
    }

    /// The employee roster context
    pub fn employees(&self) -> &EmployeesClient {
        &self.employees
    }

    /// The dashboard statistics context
    pub fn stats(&self) -> &StatsClient {
        &self.stats
    }

    /// The proof artifact download client
    pub fn proofs(&self) -> &ProofClient {
        &self.proofs
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{RegisterProfile, Role, Session};
    pub use crate::batches::{Batch, BatchStatus, NewBatch};
    pub use crate::config::{AuthScheme, ClientOptions};
    pub use crate::error::{AuthError, Error};
    pub use crate::leads::{Lead, LeadStatus, PaymentVerification, SaleDetailsPatch};
    pub use crate::proof::{ProofArtifact, ProofField, ProofKind};
    pub use crate::stats::DashboardStats;
    pub use crate::MariCrm;
}
