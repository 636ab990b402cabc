//! WeChat HTTP Client
//!
//! Provides the GET-and-decode plumbing shared by every API call.

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

use crate::error::{RequestError, WechatError};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";

/// Everything except RFC 3986 unreserved characters
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WeChat API Client
///
/// Holds the transport and base URL. Carries no credentials and no mutable
/// state, so clones can be shared freely across tasks.
#[derive(Clone)]
pub struct WechatClient {
    http: Client,
    base_url: String,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field("base_url", &self.base_url)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Create a new client builder
    pub fn builder() -> super::builder::WechatClientBuilder {
        super::builder::WechatClientBuilder::default()
    }

    pub(crate) fn from_parts(http: Client, base_url: String) -> Self {
        Self {
            http,
            base_url,
            middleware_executor: None,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying [`reqwest::Client`].
    ///
    /// Requests made through it bypass the middleware pipeline.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    /// Build the full request URL for `path` with `query` appended.
    ///
    /// Pairs are emitted sorted by key. Keys and values are percent-encoded,
    /// leaving only alphanumerics and `-_.~` as-is.
    ///
    /// # Errors
    /// Returns `RequestError::InvalidUrl` if the result does not parse as a URL.
    pub fn encode_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, RequestError> {
        let mut pairs = query.to_vec();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let encoded = pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_ENCODE_SET),
                    utf8_percent_encode(value, QUERY_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let mut raw = format!("{}{}", self.base_url, path);
        if !encoded.is_empty() {
            let separator = if path.contains('?') { '&' } else { '?' };
            raw.push(separator);
            raw.push_str(&encoded);
        }

        Url::parse(&raw).map_err(|e| RequestError::InvalidUrl(format!("{raw}: {e}")))
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, WechatError> {
        let response = self.send_request(request).await?;

        let status = response.status();
        debug!("[WechatMp] response status {}", status);
        if !status.is_success() {
            return Err(RequestError::Status(status).into());
        }

        let body = response.bytes().await?;
        let value = serde_json::from_slice(&body)?;

        Ok(value)
    }

    /// Make a GET request to WeChat API
    ///
    /// # Arguments
    /// * `path` - API endpoint path (e.g., "/cgi-bin/token")
    /// * `query` - Query parameters as key-value pairs
    ///
    /// # Errors
    /// - `WechatError::Request` for URL, transport, or non-2xx status failures
    /// - `WechatError::Decode` when the body does not match `T`
    ///
    /// A non-zero `errcode` in the body is not an error here; it is decoded
    /// into `T` like any other field.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WechatError> {
        let url = self.encode_url(path, query)?;
        debug!("[WechatMp] GET {}", path);
        let request = reqwest::Request::new(Method::GET, url);
        self.execute(request).await
    }
}

impl Service<reqwest::Request> for WechatClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}
