//! Authenticated session shared by every command.
//!
//! Holds the REST client, the persisted JWT and the hospital profile the
//! token belongs to. Only the token survives between runs; the profile is
//! refetched on [`Session::restore`].

use anyhow::{Context, Result};

use medmarket_core::model::HospitalProfile;

use crate::auth::TokenStore;
use crate::client::{LoginRequest, MarketClient};

pub struct Session {
    client: MarketClient,
    store: TokenStore,
    hospital: Option<HospitalProfile>,
}

impl Session {
    /// Build a session from whatever token is stored, without contacting the backend.
    pub fn open(api_url: &str, store: TokenStore) -> Result<Self> {
        tracing::debug!(path = %store.path().display(), "Using session store");
        let token = store.load_token().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable session file");
            None
        });
        let client = MarketClient::new(api_url, token)
            .with_context(|| format!("Cannot use backend URL {api_url}"))?;
        Ok(Self {
            client,
            store,
            hospital: None,
        })
    }

    pub fn client(&self) -> &MarketClient {
        &self.client
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.token().is_some()
    }

    pub fn hospital(&self) -> Option<&HospitalProfile> {
        self.hospital.as_ref()
    }

    /// Reload the hospital profile for the stored token.
    ///
    /// A 404 means the account manages no hospital. A 401 means the stored
    /// token is no longer accepted: it is removed and the session continues
    /// logged out. Any other failure is logged and leaves the profile empty.
    pub async fn restore(&mut self) -> Result<()> {
        self.hospital = None;
        if !self.is_authenticated() {
            return Ok(());
        }

        match self.client.my_profile().await {
            Ok(profile) => {
                tracing::debug!(hospital_id = profile.id, "Restored session");
                self.hospital = Some(profile);
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("Account has no hospital profile");
            }
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Stored session token rejected; logging out");
                self.forget_token()?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load hospital profile");
            }
        }
        Ok(())
    }

    /// Exchange an identity-provider credential for a session token and load the profile.
    pub async fn login(&mut self, id_token: &str, wallet_address: &str) -> Result<()> {
        let resp = self
            .client
            .login(&LoginRequest {
                id_token: id_token.to_string(),
                wallet_address: wallet_address.to_string(),
            })
            .await
            .context("Login failed")?;

        self.store
            .save_token(&resp.token)
            .context("Failed to save session token")?;
        self.client.set_token(Some(resp.token));
        self.restore().await
    }

    /// Drop the session. Returns whether a token was stored.
    pub fn logout(&mut self) -> Result<bool> {
        self.hospital = None;
        self.forget_token()
    }

    fn forget_token(&mut self) -> Result<bool> {
        self.client.set_token(None);
        self.store.clear_token()
    }

    pub fn require_login(&self) -> Result<()> {
        if !self.is_authenticated() {
            anyhow::bail!("Not logged in. Run: medmarket login --id-token <token> --wallet <address>");
        }
        Ok(())
    }

    /// The hospital this account manages, or an error explaining why there is none.
    pub fn require_hospital(&self) -> Result<&HospitalProfile> {
        self.require_login()?;
        self.hospital
            .as_ref()
            .context("No hospital is linked to this account")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_with_token(server: &MockServer, dir: &std::path::Path) -> Session {
        let store = TokenStore::new(dir, "default");
        store.save_token("stored-jwt").unwrap();
        Session::open(&server.uri(), store).unwrap()
    }

    async fn mock_profile(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/hospitals/my-profile"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_restore_loads_profile() {
        let server = MockServer::start().await;
        mock_profile(&server, 200, json!({"id": 3, "name": "Mercy"})).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session_with_token(&server, dir.path());
        session.restore().await.unwrap();
        assert_eq!(session.require_hospital().unwrap().name, "Mercy");
    }

    #[tokio::test]
    async fn test_restore_404_means_no_hospital() {
        let server = MockServer::start().await;
        mock_profile(&server, 404, json!({})).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session_with_token(&server, dir.path());
        session.restore().await.unwrap();
        assert!(session.is_authenticated());
        assert!(session.hospital().is_none());
        let err = session.require_hospital().unwrap_err();
        assert!(err.to_string().contains("No hospital"));
    }

    #[tokio::test]
    async fn test_restore_401_clears_token() {
        let server = MockServer::start().await;
        mock_profile(&server, 401, json!({})).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session_with_token(&server, dir.path());
        session.restore().await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(
            TokenStore::new(dir.path(), "default").load_token().unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_restore_server_error_keeps_token() {
        let server = MockServer::start().await;
        mock_profile(&server, 500, json!({"message": "boom"})).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session_with_token(&server, dir.path());
        session.restore().await.unwrap();
        assert!(session.is_authenticated());
        assert!(session.hospital().is_none());
    }

    #[tokio::test]
    async fn test_login_persists_token_and_loads_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh-jwt"})))
            .mount(&server)
            .await;
        mock_profile(&server, 200, json!({"id": 8, "name": "Hope"})).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session =
            Session::open(&server.uri(), TokenStore::new(dir.path(), "default")).unwrap();
        assert!(session.require_login().is_err());

        session.login("id-token", "0xwallet").await.unwrap();
        assert_eq!(session.client().token(), Some("fresh-jwt"));
        assert_eq!(session.hospital().map(|h| h.id), Some(8));
        assert_eq!(
            TokenStore::new(dir.path(), "default")
                .load_token()
                .unwrap()
                .as_deref(),
            Some("fresh-jwt")
        );
    }

    #[tokio::test]
    async fn test_failed_login_stores_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let mut session =
            Session::open(&server.uri(), TokenStore::new(dir.path(), "default")).unwrap();
        assert!(session.login("bad", "0x0").await.is_err());
        assert!(!session.is_authenticated());
        assert_eq!(
            TokenStore::new(dir.path(), "default").load_token().unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_logout() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_token(&server, dir.path());

        assert!(session.logout().unwrap());
        assert!(!session.is_authenticated());
        assert!(!session.logout().unwrap());
    }
}
