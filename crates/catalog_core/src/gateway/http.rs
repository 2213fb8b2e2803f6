//! REST-backed products gateway.
//!
//! # Responsibility
//! - Map gateway operations onto the `/bp/products` REST resource.
//! - Translate non-success responses into structured `GatewayError`s.
//!
//! # Invariants
//! - Base URL never ends with a slash; path ids are percent-encoded.
//! - Requests are single-shot; timeouts come from configuration.

use super::{FieldViolation, GatewayError, GatewayOp, GatewayResult, ProductsGateway};
use crate::config::CatalogConfig;
use crate::model::product::{Product, ProductUpdate};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

const PRODUCTS_PATH: [&str; 2] = ["bp", "products"];
const VERIFICATION_SEGMENT: &str = "verification";
const DEFAULT_VIOLATION_FIELD: &str = "field";
const DEFAULT_VIOLATION_MESSAGE: &str = "invalid";

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct RejectionBody {
    message: Option<String>,
    errors: Option<Vec<RawViolation>>,
}

#[derive(Deserialize)]
struct RawViolation {
    property: Option<String>,
    constraints: Option<Map<String, Value>>,
}

/// HTTP client for the catalog REST backend.
pub struct HttpProductsGateway {
    base_url: Url,
    client: Client,
}

impl HttpProductsGateway {
    /// Builds a client for `base_url` with explicit timeouts.
    ///
    /// # Errors
    /// - Returns `Transport` when the URL is invalid or cannot carry a path.
    /// - Returns `Transport` when the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> GatewayResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|err| GatewayError::Transport(format!("invalid base url `{trimmed}`: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!(
                "base url `{trimmed}` cannot carry a path"
            )));
        }
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Builds a client from resolved configuration.
    pub fn from_config(config: &CatalogConfig) -> GatewayResult<Self> {
        Self::new(
            config.api_base_url.as_str(),
            config.connect_timeout,
            config.request_timeout,
        )
    }

    /// Returns the resource URL for the given trailing segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(PRODUCTS_PATH.iter().chain(segments.iter()));
        }
        url
    }

    async fn send(&self, op: GatewayOp, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request.send().await.map_err(|err| {
            debug!(
                "event=gateway_request module=gateway op={} status=error kind=transport",
                op.as_str()
            );
            GatewayError::Transport(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(
                "event=gateway_request module=gateway op={} status=ok http_status={}",
                op.as_str(),
                status.as_u16()
            );
            return Ok(response);
        }

        debug!(
            "event=gateway_request module=gateway op={} status=error http_status={}",
            op.as_str(),
            status.as_u16()
        );
        let body = response.text().await.unwrap_or_default();
        Err(parse_rejection(Some(status.as_u16()), body.as_str()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ProductsGateway for HttpProductsGateway {
    async fn list(&self) -> GatewayResult<Vec<Product>> {
        let request = self.client.get(self.endpoint(&[]));
        let response = self.send(GatewayOp::List, request).await?;
        let envelope: DataEnvelope<Vec<Product>> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn create(&self, product: &Product) -> GatewayResult<Product> {
        let request = self.client.post(self.endpoint(&[])).json(product);
        let response = self.send(GatewayOp::Create, request).await?;
        let envelope: DataEnvelope<Product> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn update(&self, id: &str, update: &ProductUpdate) -> GatewayResult<()> {
        let request = self.client.put(self.endpoint(&[id])).json(update);
        self.send(GatewayOp::Update, request).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        let request = self.client.delete(self.endpoint(&[id]));
        self.send(GatewayOp::Delete, request).await?;
        Ok(())
    }

    async fn verify_id_exists(&self, id: &str) -> GatewayResult<bool> {
        let request = self
            .client
            .get(self.endpoint(&[VERIFICATION_SEGMENT, id]));
        let response = self.send(GatewayOp::VerifyId, request).await?;
        Self::decode(response).await
    }
}

/// Parses a non-success response body into a `Rejected` error.
///
/// Accepts `{ "message"?, "errors"?: [{ "property"?, "constraints"? }] }`.
/// Unparseable bodies yield a rejection with no message or violations.
pub fn parse_rejection(status: Option<u16>, body: &str) -> GatewayError {
    let parsed = serde_json::from_str::<RejectionBody>(body).ok();
    let (message, raw_errors) = match parsed {
        Some(body) => (body.message, body.errors.unwrap_or_default()),
        None => (None, Vec::new()),
    };

    let violations = raw_errors
        .into_iter()
        .map(|raw| {
            let field = raw
                .property
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_VIOLATION_FIELD.to_string());
            let message = raw
                .constraints
                .as_ref()
                .and_then(|constraints| constraints.values().next())
                .map(constraint_text)
                .unwrap_or_else(|| DEFAULT_VIOLATION_MESSAGE.to_string());
            FieldViolation { field, message }
        })
        .collect();

    GatewayError::Rejected {
        status,
        message,
        violations,
    }
}

fn constraint_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
