//! Session state: the signed-in user and the token attached to every request

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::endpoints;
use crate::api::{ApiClient, ApiError, ApiResult, Query};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    user: User,
    token: Option<String>,
}

/// Owned by the application and passed by reference to whatever needs the session.
#[derive(Debug)]
pub struct AuthContext {
    client: ApiClient,
    user: Option<User>,
    loading: bool,
}

impl AuthContext {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            user: None,
            loading: true,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Resolve the user for a configured token. A rejected token is dropped.
    pub async fn initialize(&mut self) {
        self.loading = true;

        if self.client.has_token() {
            match self.fetch_current_user().await {
                Ok(user) => {
                    info!("Resumed session for {}", user.email);
                    self.user = Some(user);
                }
                Err(e) => {
                    warn!("Stored session rejected: {}", e);
                    self.client.set_token(None);
                    self.user = None;
                }
            }
        }

        self.loading = false;
    }

    pub async fn fetch_current_user(&self) -> ApiResult<User> {
        self.client
            .get(endpoints::auth::CURRENT_USER, &Query::new(), "Failed to load current user")
            .await
    }

    pub async fn login(&mut self, credentials: &LoginCredentials) -> ApiResult<&User> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let data: LoginData = self
            .client
            .post(
                endpoints::auth::LOGIN,
                credentials,
                "Login failed. Please check your credentials.",
            )
            .await?;

        if let Some(token) = data.token {
            self.client.set_token(Some(token));
        }

        info!("Logged in as {}", data.user.email);
        Ok(&*self.user.insert(data.user))
    }

    /// Always ends the local session, even if the backend call fails.
    pub async fn logout(&mut self) {
        if let Err(e) = self
            .client
            .post_empty(endpoints::auth::LOGOUT, "Logout failed")
            .await
        {
            warn!("Logout request failed: {}", e);
        }

        self.client.set_token(None);
        self.user = None;
        info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn offline_client() -> ApiClient {
        let config = Config {
            api_url: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_user_accepts_either_id_field() {
        let user: User =
            serde_json::from_str(r#"{"id": "u1", "email": "admin@agency.test", "role": "admin"}"#).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.display_name(), "admin@agency.test");
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_signed_out() {
        let mut auth = AuthContext::new(offline_client());
        assert!(auth.is_loading());
        auth.initialize().await;
        assert!(!auth.is_loading());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let mut auth = AuthContext::new(offline_client());
        let err = auth
            .login(&LoginCredentials {
                email: " ".to_string(),
                password: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_logout_clears_session_when_request_fails() {
        let client = offline_client();
        client.set_token(Some("stale".to_string()));
        let mut auth = AuthContext::new(client.clone());

        auth.logout().await;

        assert!(!auth.is_authenticated());
        assert!(!client.has_token());
    }
}
