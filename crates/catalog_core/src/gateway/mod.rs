//! Products gateway contract and implementations.
//!
//! # Responsibility
//! - Define the async persistence contract consumed by list and form state.
//! - Provide the REST-backed client and an in-memory stand-in.
//!
//! # Invariants
//! - Every operation is single-shot: no retries, no cancellation, no
//!   de-duplication of identical in-flight calls.
//! - Failures are reported as `Err(GatewayError)`; callers only distinguish
//!   success from failure plus the optional structured violations.

use crate::model::product::{Product, ProductUpdate};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod http;
pub mod memory;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// One backend-reported constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire field name (`id`, `name`, ...).
    pub field: String,
    /// First violated constraint message for the field.
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Gateway failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Request never produced a response (connect, timeout, I/O).
    Transport(String),
    /// Backend answered with a non-success status.
    Rejected {
        status: Option<u16>,
        message: Option<String>,
        violations: Vec<FieldViolation>,
    },
    /// Success response body could not be decoded.
    Decode(String),
    /// Target record does not exist.
    NotFound(String),
}

impl GatewayError {
    /// Builds a rejection carrying only structured violations.
    pub fn rejected_with(violations: Vec<FieldViolation>) -> Self {
        Self::Rejected {
            status: None,
            message: None,
            violations,
        }
    }

    /// Structured per-field violations, empty when none were reported.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Rejected { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Backend-supplied human message, when present and non-blank.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(details) => write!(f, "gateway transport failure: {details}"),
            Self::Rejected {
                status,
                message,
                violations,
            } => {
                write!(f, "gateway rejected request")?;
                if let Some(status) = status {
                    write!(f, " (status {status})")?;
                }
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                if !violations.is_empty() {
                    write!(f, " [{} violation(s)]", violations.len())?;
                }
                Ok(())
            }
            Self::Decode(details) => write!(f, "gateway response could not be decoded: {details}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
        }
    }
}

impl Error for GatewayError {}

/// Gateway operation names, used for logging and test instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GatewayOp {
    List,
    Create,
    Update,
    Delete,
    VerifyId,
}

impl GatewayOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::VerifyId => "verify_id",
        }
    }
}

/// Async persistence contract for catalog products.
#[async_trait]
pub trait ProductsGateway: Send + Sync {
    /// Fetches the full catalog.
    async fn list(&self) -> GatewayResult<Vec<Product>>;
    /// Persists a new record and returns the canonical stored form.
    async fn create(&self, product: &Product) -> GatewayResult<Product>;
    /// Persists changes to an existing record.
    async fn update(&self, id: &str, update: &ProductUpdate) -> GatewayResult<()>;
    /// Removes a record.
    async fn delete(&self, id: &str) -> GatewayResult<()>;
    /// Returns `true` when `id` is already taken.
    async fn verify_id_exists(&self, id: &str) -> GatewayResult<bool>;
}

#[async_trait]
impl<T: ProductsGateway + ?Sized> ProductsGateway for Arc<T> {
    async fn list(&self) -> GatewayResult<Vec<Product>> {
        (**self).list().await
    }

    async fn create(&self, product: &Product) -> GatewayResult<Product> {
        (**self).create(product).await
    }

    async fn update(&self, id: &str, update: &ProductUpdate) -> GatewayResult<()> {
        (**self).update(id, update).await
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        (**self).delete(id).await
    }

    async fn verify_id_exists(&self, id: &str) -> GatewayResult<bool> {
        (**self).verify_id_exists(id).await
    }
}
