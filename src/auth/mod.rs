//! Credential flows against the external identity provider
//!
//! All durable account state lives in the provider; this module keeps
//! only the in-memory session and translates provider error codes into
//! the closed [`AuthErrorKind`] set before they reach any view.

pub mod google;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::IdentityConfig;
use crate::error::{AuthErrorKind, HostelError};
use crate::session::{Principal, SessionGate};

/// A provider-issued session. In-memory only; dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Short-lived bearer token for provider calls
    pub id_token: String,
    /// Token for renewing the session, when issued
    pub refresh_token: Option<String>,
    /// Provider-issued user id
    pub uid: String,
    /// Account email
    pub email: String,
    /// Whether the account completed email verification
    pub verified: bool,
    /// Expiry of the bearer token
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    fn principal(&self) -> Principal {
        Principal {
            uid: self.uid.clone(),
            email: self.email.clone(),
            verified: self.verified,
        }
    }
}

/// Port over the identity provider's account endpoints.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new email/password account
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, HostelError>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, HostelError>;

    /// Ask the provider to send the verification message for this session
    async fn send_verification(&self, id_token: &str) -> Result<(), HostelError>;

    /// Whether the session's account completed email verification
    async fn lookup_verified(&self, id_token: &str) -> Result<bool, HostelError>;

    /// Sign in with a Google OAuth token via the provider's federated flow
    async fn sign_in_with_google(&self, oauth_token: &str) -> Result<AuthSession, HostelError>;
}

/// Map a provider error code onto the closed user-facing kind set.
///
/// Codes sometimes arrive with a trailing explanation after a colon
/// (e.g. `TOO_MANY_ATTEMPTS_TRY_LATER : ...`); only the code itself is
/// matched.
#[must_use]
pub fn map_provider_code(code: &str) -> AuthErrorKind {
    let code = code.split(':').next().unwrap_or(code).trim();
    match code {
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthErrorKind::InvalidCredentials,
        "EMAIL_NOT_FOUND" => AuthErrorKind::UnknownAccount,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthErrorKind::InvalidEmailFormat,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthErrorKind::RateLimited,
        _ => AuthErrorKind::Unknown,
    }
}

/// Drives the credential flows and owns the local session slot.
///
/// The session gate is notified on every session change; it is the only
/// other observer of authentication state.
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
    gate: Arc<SessionGate>,
    session: Mutex<Option<AuthSession>>,
}

impl Authenticator {
    /// Create an authenticator over the given provider port and gate
    pub fn new(provider: Arc<dyn IdentityProvider>, gate: Arc<SessionGate>) -> Self {
        Self {
            provider,
            gate,
            session: Mutex::new(None),
        }
    }

    /// Register a new account.
    ///
    /// The provider sends a verification message; the local session is
    /// ended immediately afterwards so an unverified account can never
    /// reach a protected view.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), HostelError> {
        let session = self.provider.sign_up(email, password).await?;

        info!("Registered account for {}", session.email);

        self.provider.send_verification(&session.id_token).await?;
        self.clear_session();

        Ok(())
    }

    /// Sign in with email and password.
    ///
    /// An unverified account terminates the session immediately and
    /// fails; `resend_verification` re-issues the message on request.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, HostelError> {
        let mut session = self.provider.sign_in(email, password).await?;

        let verified = self.provider.lookup_verified(&session.id_token).await?;
        if !verified {
            self.clear_session();
            return Err(HostelError::auth(
                AuthErrorKind::UnverifiedEmail,
                format!("account {} has not completed email verification", email),
            ));
        }

        session.verified = true;
        self.install_session(session.clone());

        Ok(session)
    }

    /// Re-send the verification message for an unverified account.
    ///
    /// Signing in is the only way to obtain a token to send the message
    /// with; the session is dropped again right after.
    pub async fn resend_verification(&self, email: &str, password: &str) -> Result<(), HostelError> {
        let session = self.provider.sign_in(email, password).await?;

        self.provider.send_verification(&session.id_token).await?;
        self.clear_session();

        debug!("Re-sent verification message for {}", email);

        Ok(())
    }

    /// Sign in through the provider's federated Google flow.
    ///
    /// Principals arriving this way are treated as already verified.
    pub async fn login_with_google(&self, oauth_token: &str) -> Result<AuthSession, HostelError> {
        let mut session = self.provider.sign_in_with_google(oauth_token).await?;

        session.verified = true;
        self.install_session(session.clone());

        Ok(session)
    }

    /// End the current session
    pub fn logout(&self) {
        info!("Signing out");
        self.clear_session();
    }

    /// The active session, if any
    #[must_use]
    pub fn current_session(&self) -> Option<AuthSession> {
        self.session.lock().unwrap().clone()
    }

    fn install_session(&self, session: AuthSession) {
        let principal = session.principal();
        *self.session.lock().unwrap() = Some(session);
        self.gate.report(Some(&principal));
    }

    fn clear_session(&self) {
        *self.session.lock().unwrap() = None;
        self.gate.report(None);
    }
}

/// Identity provider client for the Identity Toolkit REST surface
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    /// Create a provider client from the identity configuration.
    ///
    /// Fails when the project is missing its API key.
    pub fn new(config: &IdentityConfig, timeout_seconds: u32) -> Result<Self, HostelError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| HostelError::config("Identity provider API key is not configured"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .user_agent(concat!("HostelFinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostelError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    async fn post<B, R>(&self, action: &str, body: &B) -> Result<R, HostelError>
    where
        B: serde::Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(action))
            .json(body)
            .send()
            .await
            .map_err(HostelError::from_transport)?;

        if !response.status().is_success() {
            let failure: identity_api::FailureResponse = response.json().await.map_err(|e| {
                HostelError::query(format!("Failed to parse provider error response: {e}"))
            })?;
            let code = failure.error.message;
            return Err(HostelError::auth(map_provider_code(&code), code));
        }

        response
            .json()
            .await
            .map_err(|e| HostelError::query(format!("Failed to parse provider response: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, HostelError> {
        let body = identity_api::CredentialsRequest::new(email, password);
        let response: identity_api::TokenResponse = self.post("signUp", &body).await?;
        Ok(response.into_session())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, HostelError> {
        let body = identity_api::CredentialsRequest::new(email, password);
        let response: identity_api::TokenResponse =
            self.post("signInWithPassword", &body).await?;
        Ok(response.into_session())
    }

    async fn send_verification(&self, id_token: &str) -> Result<(), HostelError> {
        let body = identity_api::OobCodeRequest::verify_email(id_token);
        let _: serde_json::Value = self.post("sendOobCode", &body).await?;
        Ok(())
    }

    async fn lookup_verified(&self, id_token: &str) -> Result<bool, HostelError> {
        let body = identity_api::LookupRequest {
            id_token: id_token.to_string(),
        };
        let response: identity_api::LookupResponse = self.post("lookup", &body).await?;

        Ok(response
            .users
            .first()
            .is_some_and(|user| user.email_verified))
    }

    async fn sign_in_with_google(&self, oauth_token: &str) -> Result<AuthSession, HostelError> {
        let body = identity_api::IdpRequest::google(oauth_token);
        let response: identity_api::TokenResponse = self.post("signInWithIdp", &body).await?;
        Ok(response.into_session())
    }
}

/// Identity Toolkit request and response structures
mod identity_api {
    use chrono::{Duration, Utc};
    use serde::{Deserialize, Serialize};

    use super::AuthSession;

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CredentialsRequest {
        pub email: String,
        pub password: String,
        pub return_secure_token: bool,
    }

    impl CredentialsRequest {
        pub fn new(email: &str, password: &str) -> Self {
            Self {
                email: email.to_string(),
                password: password.to_string(),
                return_secure_token: true,
            }
        }
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OobCodeRequest {
        pub request_type: String,
        pub id_token: String,
    }

    impl OobCodeRequest {
        pub fn verify_email(id_token: &str) -> Self {
            Self {
                request_type: "VERIFY_EMAIL".to_string(),
                id_token: id_token.to_string(),
            }
        }
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LookupRequest {
        pub id_token: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LookupResponse {
        #[serde(default)]
        pub users: Vec<UserRecord>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserRecord {
        #[serde(default)]
        pub email_verified: bool,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IdpRequest {
        pub post_body: String,
        pub request_uri: String,
        pub return_secure_token: bool,
    }

    impl IdpRequest {
        pub fn google(oauth_token: &str) -> Self {
            Self {
                post_body: format!("access_token={oauth_token}&providerId=google.com"),
                request_uri: "http://localhost".to_string(),
                return_secure_token: true,
            }
        }
    }

    /// Token-bearing response shared by sign-up, sign-in, and IdP calls
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TokenResponse {
        pub id_token: String,
        #[serde(default)]
        pub refresh_token: Option<String>,
        pub local_id: String,
        #[serde(default)]
        pub email: Option<String>,
        /// Seconds until `id_token` expires, as a decimal string
        #[serde(default)]
        pub expires_in: Option<String>,
    }

    impl TokenResponse {
        pub fn into_session(self) -> AuthSession {
            let expires_in = self
                .expires_in
                .as_deref()
                .and_then(|seconds| seconds.parse::<i64>().ok())
                .unwrap_or(3600);

            AuthSession {
                id_token: self.id_token,
                refresh_token: self.refresh_token,
                uid: self.local_id,
                email: self.email.unwrap_or_default(),
                verified: false,
                expires_at: Utc::now() + Duration::seconds(expires_in),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct FailureResponse {
        pub error: FailureDetail,
    }

    #[derive(Debug, Deserialize)]
    pub struct FailureDetail {
        pub message: String,
    }
}
