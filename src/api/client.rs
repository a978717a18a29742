//! Shared HTTP client: base URL, bearer token, cookie store, envelope unwrapping

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::envelope::{decode_envelope, Envelope};
use super::error::{ApiError, ApiResult};
use crate::config::Config;

/// Query string pairs
pub type Query = Vec<(String, String)>;

/// Cheap to clone; clones share the session token and cookie jar.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base().to_string(),
            token: Arc::new(RwLock::new(config.api_token.clone())),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}", method, path);
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
        fallback: &str,
    ) -> ApiResult<Envelope<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_envelope(status.as_u16(), &body, path, fallback)
    }

    /// GET returning the whole envelope (for `count`)
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        fallback: &str,
    ) -> ApiResult<Envelope<T>> {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(builder, path, fallback).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        fallback: &str,
    ) -> ApiResult<T> {
        self.get_envelope(path, query, fallback)
            .await?
            .into_data(path)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(builder, path, fallback).await?.into_data(path)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B, fallback: &str) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.execute(builder, path, fallback).await?.into_data(path)
    }

    /// POST where only success matters (logout)
    pub async fn post_empty(&self, path: &str, fallback: &str) -> ApiResult<()> {
        let builder = self.request(Method::POST, path);
        self.execute::<serde_json::Value>(builder, path, fallback)
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, path: &str, fallback: &str) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, path);
        self.execute::<serde_json::Value>(builder, path, fallback)
            .await
            .map(|_| ())
    }

    /// DELETE that returns the updated parent record
    pub async fn delete_returning<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> ApiResult<T> {
        let builder = self.request(Method::DELETE, path);
        self.execute(builder, path, fallback).await?.into_data(path)
    }

    /// Raw bytes of a binary download. Error bodies are still JSON envelopes.
    pub async fn download(&self, path: &str, fallback: &str) -> ApiResult<Vec<u8>> {
        let response = self.request(Method::GET, path).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            return decode_envelope::<serde_json::Value>(status.as_u16(), &body, path, fallback)
                .map(|_| Vec::new());
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Multipart upload of a single file field
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
        fallback: &str,
    ) -> ApiResult<Envelope<serde_json::Value>> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(field.to_string(), part);
        let builder = self.request(Method::POST, path).multipart(form);
        self.execute(builder, path, fallback).await
    }

    /// Fail early for operations that need a session
    pub fn require_token(&self) -> ApiResult<()> {
        if self.has_token() {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let config = Config {
            api_url: "https://agency.example.com/api/".to_string(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/visa"), "https://agency.example.com/api/visa");
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let client = ApiClient::new(&Config::default()).unwrap();
        let clone = client.clone();
        assert!(!clone.has_token());
        assert!(clone.require_token().is_err());

        client.set_token(Some("abc".to_string()));
        assert_eq!(clone.token().as_deref(), Some("abc"));
        assert!(clone.require_token().is_ok());

        clone.set_token(None);
        assert!(!client.has_token());
    }
}
