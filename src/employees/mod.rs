//! Employee roster
//!
//! Read-mostly from the client's perspective: the roster feeds the admin
//! dashboard's assignment dropdowns. The one write-ish action is the
//! allotment reset, which the backend exposes as a GET.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::auth::{Auth, Employee, Role};
use crate::config::ClientOptions;
use crate::context::ResourceContext;
use crate::error::Error;
use crate::fetch::Fetch;

#[derive(Deserialize)]
#[serde(untagged)]
enum EmployeeListResponse {
    Wrapped { employees: Vec<Employee> },
    Bare(Vec<Employee>),
}

impl EmployeeListResponse {
    fn into_employees(self) -> Vec<Employee> {
        match self {
            EmployeeListResponse::Wrapped { employees } => employees,
            EmployeeListResponse::Bare(employees) => employees,
        }
    }
}

/// Client for the employee resource family
pub struct EmployeesClient {
    url: String,
    client: Client,
    auth: Arc<Auth>,
    options: ClientOptions,
    collection: Arc<RwLock<Vec<Employee>>>,
}

impl EmployeesClient {
    /// Create a new EmployeesClient
    pub(crate) fn new(url: &str, client: Client, auth: Arc<Auth>, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            auth,
            options,
            collection: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Replace the cached roster with the server's current snapshot
    pub async fn fetch_all(&self) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let url = self.endpoint("/admin/employee/");

        let employees = Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .execute::<EmployeeListResponse>()
            .await?
            .into_employees();

        debug!(count = employees.len(), "employee roster replaced");
        let mut collection = self.collection.write().unwrap();
        *collection = employees;
        Ok(())
    }

    /// A copy of the cached roster
    pub fn snapshot(&self) -> Vec<Employee> {
        self.collection.read().unwrap().clone()
    }

    /// Cached employees holding a given role
    pub fn with_role(&self, role: Role) -> Vec<Employee> {
        self.collection
            .read()
            .unwrap()
            .iter()
            .filter(|employee| employee.employee_details.role == role)
            .cloned()
            .collect()
    }

    /// Reset the per-caller lead allotment counters (admin).
    ///
    /// Affects leads, not the roster; callers refetch the lead collection
    /// afterwards.
    pub async fn reset_allotted_leads(&self) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let url = self.endpoint("/admin/reset-allot-leads/");

        Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .send()
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ResourceContext for EmployeesClient {
    async fn refresh(&self) -> Result<(), Error> {
        self.fetch_all().await
    }

    fn invalidate(&self) {
        self.collection.write().unwrap().clear();
    }
}
