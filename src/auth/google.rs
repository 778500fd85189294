//! Google authorization-code flow for federated login
//!
//! Drives the OAuth consent redirect and code exchange with PKCE. The
//! resulting OAuth token is handed to the identity provider's federated
//! sign-in endpoint; this module never talks to the provider itself.

use std::sync::Mutex;

use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl, basic::BasicClient,
};
use tracing::info;

use crate::config::IdentityConfig;
use crate::error::{AuthErrorKind, HostelError};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const SCOPES: [&str; 3] = ["openid", "email", "profile"];

/// Google OAuth web flow with PKCE.
pub struct GoogleWebFlow {
    client: BasicClient,
    // Held between building the consent URL and the callback exchange
    pkce_verifier: Mutex<Option<PkceCodeVerifier>>,
}

impl GoogleWebFlow {
    /// Build the flow from the identity configuration.
    ///
    /// Fails when any of the Google OAuth settings is missing.
    pub fn new(config: &IdentityConfig) -> Result<Self, HostelError> {
        let client_id = config
            .google_client_id
            .clone()
            .ok_or_else(|| HostelError::config("Google OAuth client id is not configured"))?;
        let client_secret = config
            .google_client_secret
            .clone()
            .ok_or_else(|| HostelError::config("Google OAuth client secret is not configured"))?;
        let redirect_url = config
            .google_redirect_url
            .clone()
            .ok_or_else(|| HostelError::config("Google OAuth redirect URL is not configured"))?;

        let auth_url = AuthUrl::new(AUTH_URL.to_string())
            .map_err(|e| HostelError::config(format!("Invalid auth URL: {e}")))?;
        let token_url = TokenUrl::new(TOKEN_URL.to_string())
            .map_err(|e| HostelError::config(format!("Invalid token URL: {e}")))?;
        let redirect_url = RedirectUrl::new(redirect_url)
            .map_err(|e| HostelError::config(format!("Invalid redirect URL: {e}")))?;

        let client = BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url);

        Ok(Self {
            client,
            pkce_verifier: Mutex::new(None),
        })
    }

    /// Build the consent URL the browser is sent to.
    ///
    /// Returns the URL and the CSRF state to verify on the callback. The
    /// PKCE verifier is stored for the matching `exchange_code` call.
    pub fn build_authorization_url(&self) -> (String, String) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = self.client.authorize_url(CsrfToken::new_random);
        for scope in SCOPES {
            request = request.add_scope(Scope::new(scope.to_string()));
        }
        let (auth_url, csrf_token) = request.set_pkce_challenge(pkce_challenge).url();

        *self.pkce_verifier.lock().unwrap() = Some(pkce_verifier);

        (auth_url.to_string(), csrf_token.secret().clone())
    }

    /// Exchange the callback code for an OAuth token.
    ///
    /// The returned token goes to the identity provider's federated
    /// sign-in endpoint.
    pub async fn exchange_code(&self, code: &str) -> Result<String, HostelError> {
        let pkce_verifier = self.pkce_verifier.lock().unwrap().take().ok_or_else(|| {
            HostelError::auth(
                AuthErrorKind::Unknown,
                "No PKCE verifier found - authentication flow may have restarted",
            )
        })?;

        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(pkce_verifier)
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| {
                HostelError::auth(
                    AuthErrorKind::Unknown,
                    format!("Failed to exchange code for token: {e}"),
                )
            })?;

        info!("Exchanged authorization code for Google OAuth token");

        Ok(token_response.access_token().secret().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google_config() -> IdentityConfig {
        IdentityConfig {
            google_client_id: Some("client-id".to_string()),
            google_client_secret: Some("client-secret".to_string()),
            google_redirect_url: Some("http://localhost:4000/oauth/callback".to_string()),
            ..IdentityConfig::default()
        }
    }

    #[test]
    fn test_flow_requires_complete_google_settings() {
        let result = GoogleWebFlow::new(&IdentityConfig::default());
        assert!(matches!(result, Err(HostelError::Config { .. })));
    }

    #[test]
    fn test_authorization_url_carries_scopes_and_state() {
        let flow = GoogleWebFlow::new(&google_config()).unwrap();

        let (url, csrf_state) = flow.build_authorization_url();

        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("code_challenge"));
        assert!(url.contains("scope="));
        assert!(!csrf_state.is_empty());
    }

    #[tokio::test]
    async fn test_exchange_without_pending_flow_fails() {
        let flow = GoogleWebFlow::new(&google_config()).unwrap();

        let result = flow.exchange_code("callback-code").await;

        assert!(matches!(
            result,
            Err(HostelError::Auth {
                kind: AuthErrorKind::Unknown,
                ..
            })
        ));
    }
}
