use anyhow::Context;
use http::{header, HeaderMap, HeaderValue};
use reqwest_middleware::reqwest::{Method, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::{SpanBackendWithUrl, TracingMiddleware};
use serde::Serialize;

use crate::error::{ApiError, TickTickError};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Status and raw body of an HTTP exchange, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: ClientWithMiddleware,
}

impl ApiClient {
    pub fn build(mut default_headers: HeaderMap) -> Result<Self, TickTickError> {
        default_headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));

        let reqwest_client = reqwest_middleware::reqwest::Client::builder()
            .default_headers(default_headers)
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Cannot build TickTick HTTP client")?;

        Ok(Self {
            client: ClientBuilder::new(reqwest_client)
                .with(TracingMiddleware::<SpanBackendWithUrl>::new())
                .build(),
        })
    }

    async fn execute(&self, request_builder: RequestBuilder) -> Result<RawResponse, ApiError> {
        let response = request_builder.send().await.map_err(ApiError::network)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::network)?;

        Ok(RawResponse { status, body })
    }

    /// Send a request carrying `authorization` and an optional JSON body
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        authorization: &HeaderValue,
        request_body: Option<&T>,
    ) -> Result<RawResponse, ApiError> {
        let mut request_builder = self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, authorization.clone());
        if let Some(body) = request_body {
            request_builder = request_builder.json(body);
        }

        self.execute(request_builder).await
    }

    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        url: &str,
        authorization: &HeaderValue,
        form: &T,
    ) -> Result<RawResponse, ApiError> {
        self.execute(
            self.client
                .post(url)
                .header(header::AUTHORIZATION, authorization.clone())
                .form(form),
        )
        .await
    }
}
