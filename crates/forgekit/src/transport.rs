//! HTTP transport for the forge API
//!
//! Applies the client configuration (endpoint, token, headers) uniformly to
//! every request and turns non-success responses into typed errors.

use std::time::Duration;

use forgekit_core::ForgeConfig;
use reqwest::header;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Authenticated HTTP transport underneath the typed operations
pub(crate) struct Transport {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl Transport {
    /// Build a transport from configuration
    pub(crate) fn new(config: &ForgeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub(crate) async fn head(&self, path: &str) -> Result<()> {
        let response = self.request(Method::HEAD, path).send().await?;
        check_status(response, path).await?;
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        parse(response, path).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        parse(response, path).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        parse(response, path).await
    }

    /// POST with no body and a per-request timeout override
    pub(crate) async fn post_empty(&self, path: &str, timeout: Duration) -> Result<()> {
        let response = self
            .request(Method::POST, path)
            .timeout(timeout)
            .send()
            .await?;
        check_status(response, path).await?;
        Ok(())
    }

    pub(crate) async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        parse(response, path).await
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.api_url, path);
        debug!("{} {}", method, url);

        let mut builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, ACCEPT_HEADER);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("token {}", token));
        }
        builder
    }
}

/// Body shape of the service's error responses
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

async fn parse<T: DeserializeOwned>(response: Response, resource: &str) -> Result<T> {
    let response = check_status(response, resource).await?;
    Ok(response.json().await?)
}

async fn check_status(response: Response, resource: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::not_found(resource));
    }
    let message = response
        .json::<ApiErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.to_string());
    Err(Error::api(status.as_u16(), message))
}
