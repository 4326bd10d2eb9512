//! Proof artifact download
//!
//! Fetches the uploaded payment/discount/books/form evidence for a lead so
//! it can be inspected out of band. Artifacts are fetched on demand with
//! the session token and never cached.

mod types;

use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Client for downloading proof artifacts
pub struct ProofClient {
    url: String,
    client: Client,
    auth: Arc<Auth>,
    options: ClientOptions,
}

impl ProofClient {
    /// Create a new ProofClient
    pub(crate) fn new(url: &str, client: Client, auth: Arc<Auth>, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            auth,
            options,
        }
    }

    /// Download one proof artifact for a lead.
    ///
    /// Non-2xx responses surface as `Error::Request`; calling while logged
    /// out fails with `AuthError::NotLoggedIn` before any request is sent.
    pub async fn download(&self, lead_id: i64, field: ProofField) -> Result<ProofArtifact, Error> {
        let token = self.auth.require_token()?;
        let url = format!("{}/gen/lead/{}/download-image/", self.url, lead_id);

        let mut params = HashMap::new();
        params.insert("field".to_string(), field.as_str().to_string());

        let response = Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .query(params)
            .send()
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response.bytes().await?;

        Ok(ProofArtifact {
            lead_id,
            field,
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
