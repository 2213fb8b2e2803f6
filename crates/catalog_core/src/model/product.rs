//! Product record model.
//!
//! # Responsibility
//! - Define the canonical product shape used on the wire and in list/form state.
//! - Provide the id-less update payload shape.
//!
//! # Invariants
//! - Field names serialize exactly as the backend expects (`date_release`,
//!   `date_revision`).
//! - A fetched `Product` is treated as immutable by client state; edits go
//!   through the form's working copy.

use serde::{Deserialize, Serialize};

/// Catalog-wide unique product identifier.
pub type ProductId = String;

/// Catalog product as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique id, 3..=10 chars.
    pub id: ProductId,
    /// Display name, 6..=100 chars.
    pub name: String,
    /// Free text, 10..=200 chars.
    pub description: String,
    /// Logo URL or asset path.
    pub logo: String,
    /// ISO `YYYY-MM-DD` release day.
    pub date_release: String,
    /// ISO `YYYY-MM-DD`, always `date_release` + 1 year.
    pub date_revision: String,
}

impl Product {
    /// Splits the record into its id and the id-less update payload.
    pub fn into_update(self) -> (ProductId, ProductUpdate) {
        let Product {
            id,
            name,
            description,
            logo,
            date_release,
            date_revision,
        } = self;
        (
            id,
            ProductUpdate {
                name,
                description,
                logo,
                date_release,
                date_revision,
            },
        )
    }

    /// Case-insensitive substring match against id, name and description.
    ///
    /// `needle` must already be lowercased and trimmed.
    pub fn matches_needle(&self, needle: &str) -> bool {
        [&self.id, &self.name, &self.description]
            .iter()
            .any(|value| value.to_lowercase().contains(needle))
    }
}

/// Update payload: every product field except `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: String,
    pub date_revision: String,
}

impl ProductUpdate {
    /// Rebuilds a full record for the given id.
    pub fn with_id(self, id: impl Into<ProductId>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            description: self.description,
            logo: self.logo,
            date_release: self.date_release,
            date_revision: self.date_revision,
        }
    }
}
