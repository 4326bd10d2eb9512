//! Authentication and session lifecycle
//!
//! Owns the single active [`Session`]: login and register create it,
//! `logout` destroys it, and the optional [`SessionStore`] keeps it across
//! restarts. Every resource client borrows the token from here.

mod session;
mod types;

use reqwest::Client;
use serde_json::json;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::config::ClientOptions;
use crate::error::{AuthError, Error};
use crate::fetch::Fetch;

pub use session::{Session, SessionStore};
pub use types::*;

/// Client for MariCRM authentication
pub struct Auth {
    /// The base URL for the MariCRM API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: Arc<RwLock<Option<Session>>>,

    /// On-disk store, when persistence is configured
    store: Option<SessionStore>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, client: Client, options: ClientOptions) -> Self {
        let store = if options.persist_session {
            options.session_file.clone().map(SessionStore::new)
        } else {
            None
        };

        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            session: Arc::new(RwLock::new(None)),
            store,
            options,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Restore a persisted session from disk, if one exists.
    ///
    /// Call once at startup; a missing or unreadable file leaves the client
    /// logged out without error.
    pub fn restore_session(&self) -> Result<Option<Session>, Error> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let restored = store.load()?;
        if let Some(ref session) = restored {
            debug!(user_id = session.user_id, role = session.role.as_str(), "session restored");
            let mut current = self.session.write().unwrap();
            *current = Some(session.clone());
        }
        Ok(restored)
    }

    /// Sign in with email and password.
    ///
    /// A 400/401/403 response means the backend rejected the credentials;
    /// the prior session (in memory and on disk) is left untouched in that
    /// case.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let url = self.endpoint("/auth/login/");
        let payload = json!({ "email": email, "password": password });

        let result = Fetch::post(&self.client, &url)
            .json(&payload)?
            .execute::<AuthResponse>()
            .await;

        let response = match result {
            Err(Error::Request { status, .. }) if matches!(status, 400 | 401 | 403) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            other => other?,
        };

        self.install_session(response)
    }

    /// Register a new user.
    ///
    /// Password confirmation and minimum length are checked locally before
    /// any request is sent; on success the new session is installed exactly
    /// like a login.
    pub async fn register(&self, profile: RegisterProfile) -> Result<Session, Error> {
        if profile.password != profile.confirm_password {
            return Err(AuthError::ValidationFailed("passwords do not match".into()).into());
        }
        if profile.password.len() < 6 {
            return Err(
                AuthError::ValidationFailed("password must be at least 6 characters".into())
                    .into(),
            );
        }

        let url = self.endpoint("/auth/user/");
        let response = Fetch::post(&self.client, &url)
            .json(&profile)?
            .execute::<AuthResponse>()
            .await?;

        self.install_session(response)
    }

    /// Sign out, clearing the in-memory session and the session file.
    ///
    /// Idempotent: calling while logged out is a no-op.
    pub fn logout(&self) -> Result<(), Error> {
        {
            let mut current = self.session.write().unwrap();
            *current = None;
        }
        if let Some(store) = &self.store {
            store.clear()?;
        }
        Ok(())
    }

    /// Fetch the profile of the signed-in user
    pub async fn current_user(&self) -> Result<Employee, Error> {
        let token = self.require_token()?;
        let url = self.endpoint("/gen/current-user/");

        let user = Fetch::get(&self.client, &url)
            .auth(self.options.auth_scheme, &token)
            .execute::<Employee>()
            .await?;

        Ok(user)
    }

    /// Install a session obtained elsewhere (memory only, not persisted)
    pub fn set_session(&self, session: Session) {
        let mut current = self.session.write().unwrap();
        *current = Some(session);
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        let current = self.session.read().unwrap();
        current.clone()
    }

    /// The dashboard route for the signed-in role, for the page router
    pub fn landing_path(&self) -> Option<&'static str> {
        self.get_session().map(|s| s.role.landing_path())
    }

    /// The current bearer token, or `AuthError::NotLoggedIn`
    pub(crate) fn require_token(&self) -> Result<String, Error> {
        let current = self.session.read().unwrap();
        match *current {
            Some(ref session) => Ok(session.access_token.clone()),
            None => Err(AuthError::NotLoggedIn.into()),
        }
    }

    /// The role of the current session, or `AuthError::NotLoggedIn`
    pub(crate) fn require_role(&self) -> Result<Role, Error> {
        let current = self.session.read().unwrap();
        match *current {
            Some(ref session) => Ok(session.role),
            None => Err(AuthError::NotLoggedIn.into()),
        }
    }

    fn install_session(&self, response: AuthResponse) -> Result<Session, Error> {
        let role = response.role().ok_or_else(|| {
            Error::Json(serde::de::Error::custom("auth response carries no role"))
        })?;

        let session = Session {
            user_id: response.user.id,
            email: response.user.email,
            display_name: response.user.name,
            role,
            access_token: response.token,
        };

        if let Some(store) = &self.store {
            store.save(&session)?;
        }

        let mut current = self.session.write().unwrap();
        *current = Some(session.clone());

        Ok(session)
    }
}
