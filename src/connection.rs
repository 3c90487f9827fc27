use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::auth::Auth;
use crate::config::{apply_headers, base_headers, json_headers, ClientConfig, USER_AGENT};
use crate::errors::{Error, Result, ServerError};
use crate::retry::RetryPolicy;

/// HTTP transport for an OData version 4.0 service. All four operations take
/// absolute URLs; callers join resource paths onto the service base
/// themselves (see [`crate::config::resource_url`]).
#[derive(Debug, Clone)]
pub struct ODataConnection {
    client: reqwest::Client,
    auth: Auth,
    retry: RetryPolicy,
}

impl ODataConnection {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            auth: config.auth(),
            retry: RetryPolicy::default(),
        })
    }

    /// Wraps a caller-supplied client. The caller owns the client's timeout
    /// and middleware, so no retry policy is mounted; opt back in with
    /// [`with_retry`](Self::with_retry).
    pub fn with_client(client: reqwest::Client, auth: Auth) -> Self {
        Self {
            client,
            auth,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn execute_get(
        &self,
        url: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Option<Value>> {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, base_headers());

        tracing::info!("GET {url}");
        if let Some(params) = params {
            tracing::debug!("Query: {params:?}");
        }

        let mut request = self.client.get(url).headers(headers);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = self.send_with_retry(&Method::GET, request).await?;
        let response = handle_odata_error(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let content_type = content_type_of(&response);
        if is_json(&content_type) {
            return Ok(Some(response.json::<Value>().await?));
        }

        Err(Error::UnsupportedContentType(content_type))
    }

    pub async fn execute_post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        data: &T,
        params: Option<&[(String, String)]>,
    ) -> Result<Option<Value>> {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, json_headers());

        let body = serde_json::to_string(data)?;

        tracing::info!("POST {url}");
        tracing::debug!("Payload: {body}");

        let mut request = self.client.post(url).headers(headers).body(body);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = self.send_with_retry(&Method::POST, request).await?;
        let response = handle_odata_error(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let content_type = content_type_of(&response);
        if is_json(&content_type) {
            return Ok(Some(response.json::<Value>().await?));
        }

        // POSTing to an Action may not return data
        Ok(None)
    }

    pub async fn execute_patch<T: Serialize + ?Sized>(&self, url: &str, data: &T) -> Result<()> {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, json_headers());

        let body = serde_json::to_string(data)?;

        tracing::info!("PATCH {url}");
        tracing::debug!("Payload: {body}");

        let request = self.client.patch(url).headers(headers).body(body);
        let response = self.send_with_retry(&Method::PATCH, request).await?;
        handle_odata_error(response).await?;

        Ok(())
    }

    pub async fn execute_delete(&self, url: &str) -> Result<()> {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, base_headers());

        tracing::info!("DELETE {url}");

        let request = self.client.delete(url).headers(headers);
        let response = self.send_with_retry(&Method::DELETE, request).await?;
        handle_odata_error(response).await?;

        Ok(())
    }

    async fn send_with_retry(
        &self,
        method: &Method,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let request = self.auth.apply(request);
        let mut attempt: u32 = 0;

        loop {
            let current = match request.try_clone() {
                Some(clone) => clone,
                // Streaming bodies cannot be replayed; send once.
                None => return Ok(request.send().await?),
            };

            let response = current.send().await?;
            let status = response.status();

            if attempt < self.retry.total && self.retry.should_retry(method, status) {
                attempt += 1;
                let delay = self.retry.delay(attempt);
                tracing::warn!(
                    "HTTP {} from {} {}, retry {}/{} in {:?}",
                    status.as_u16(),
                    method,
                    response.url(),
                    attempt,
                    self.retry.total,
                    delay,
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return Ok(response);
        }
    }
}

async fn handle_odata_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return Ok(response);
    }

    let content_type = content_type_of(&response);
    let body = response.bytes().await.unwrap_or_default();

    Err(Error::Server(ServerError::parse(
        status,
        &content_type,
        &body,
    )))
}

fn content_type_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn is_json(content_type: &str) -> bool {
    content_type.contains("application/json")
}
