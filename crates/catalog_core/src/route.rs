//! Route model and navigation payloads.
//!
//! # Responsibility
//! - Resolve paths into the list/create/edit screens.
//! - Carry an optional out-of-band product record alongside a navigation.
//!
//! # Invariants
//! - Unknown and empty paths resolve to the product list.
//! - Only `EditProduct` supplies a route identifier.

use crate::model::product::{Product, ProductId};

const PRODUCTS_SEGMENT: &str = "products";
const NEW_SEGMENT: &str = "new";
const EDIT_SEGMENT: &str = "edit";

/// Application screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ProductList,
    NewProduct,
    EditProduct { id: ProductId },
}

impl Route {
    /// Resolves a path such as `/products/abc/edit`.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();

        match segments.as_slice() {
            [PRODUCTS_SEGMENT, NEW_SEGMENT] => Self::NewProduct,
            [PRODUCTS_SEGMENT, id, EDIT_SEGMENT] => Self::EditProduct {
                id: (*id).to_string(),
            },
            _ => Self::ProductList,
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::ProductList => format!("/{PRODUCTS_SEGMENT}"),
            Self::NewProduct => format!("/{PRODUCTS_SEGMENT}/{NEW_SEGMENT}"),
            Self::EditProduct { id } => format!("/{PRODUCTS_SEGMENT}/{id}/{EDIT_SEGMENT}"),
        }
    }

    /// Route-supplied identifier of the record being edited.
    pub fn edit_id(&self) -> Option<&str> {
        match self {
            Self::EditProduct { id } => Some(id.as_str()),
            _ => None,
        }
    }
}

/// Navigation request with an optional out-of-band record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub product: Option<Product>,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self {
            route,
            product: None,
        }
    }

    /// Navigation to the edit screen carrying the known record.
    pub fn edit(product: Product) -> Self {
        Self {
            route: Route::EditProduct {
                id: product.id.clone(),
            },
            product: Some(product),
        }
    }
}

/// Form construction parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    /// Route identifier; `None` means create mode.
    pub edit_id: Option<ProductId>,
    /// Record passed along by the caller to skip a fetch.
    pub product: Option<Product>,
}

impl FormRequest {
    pub fn create() -> Self {
        Self::default()
    }

    /// Edit request without a known record; the form fetches it.
    pub fn edit(id: impl Into<ProductId>) -> Self {
        Self {
            edit_id: Some(id.into()),
            product: None,
        }
    }
}

impl From<Navigation> for FormRequest {
    fn from(navigation: Navigation) -> Self {
        Self {
            edit_id: navigation.route.edit_id().map(str::to_string),
            product: navigation.product,
        }
    }
}
