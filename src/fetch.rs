//! HTTP request building and uniform response translation
//!
//! Every outbound request goes through [`FetchBuilder`]: it attaches the
//! `Authorization` header when a token is supplied, serializes JSON bodies,
//! hands multipart bodies to reqwest untouched, and translates any non-2xx
//! response into [`Error::Request`] with the server's message when one can
//! be extracted from the body. No retries: one request, one outcome.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

use crate::config::AuthScheme;
use crate::error::Error;

enum Body {
    None,
    Json(Vec<u8>),
    Multipart(multipart::Form),
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Option<HashMap<String, String>>,
    body: Body,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            headers: HeaderMap::new(),
            query_params: None,
            body: Body::None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Attach the session token as the `Authorization` header
    pub fn auth(self, scheme: AuthScheme, token: &str) -> Self {
        self.header("Authorization", &scheme.header_value(token))
    }

    /// Add query parameters to the request
    pub fn query(mut self, params: HashMap<String, String>) -> Self {
        self.query_params = Some(params);
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Body::Json(json);
        Ok(self)
    }

    /// Add a multipart body to the request
    ///
    /// The JSON content-type header is never set for multipart requests;
    /// reqwest supplies the boundary header itself.
    pub fn multipart(mut self, form: multipart::Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    fn build(self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if let Some(params) = &self.query_params {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers);

        match self.body {
            Body::None => {}
            Body::Json(bytes) => {
                req = req
                    .header("Content-Type", "application/json")
                    .body(bytes);
            }
            Body::Multipart(form) => {
                req = req.multipart(form);
            }
        }

        Ok(req)
    }

    /// Execute the request, translating non-2xx responses into errors
    pub async fn send(self) -> Result<reqwest::Response, Error> {
        let method = self.method.clone();
        let url = self.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = self.build()?.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%method, %url, status = status.as_u16(), "request failed");
            return Err(Error::request(status.as_u16(), extract_message(&text)));
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, Error> {
        let response = self.send().await?;
        let result = response.json::<T>().await?;
        Ok(result)
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The backend usually replies with `{"message": "..."}`; anything else
/// falls back to the raw body, or a generic string when the body is empty.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "request failed".to_string()
    } else {
        body.to_string()
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PATCH request
    pub fn patch<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PATCH)
    }
}
