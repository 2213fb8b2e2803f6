//! Client-side core for the product catalog.
//!
//! Owns the list and form state machines, their validation rules and the
//! gateway contract they call into. Rendering, routing and transport hosts
//! live outside this crate.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod route;
pub mod state;
pub mod validation;

pub use config::{CatalogConfig, ConfigError};
pub use gateway::http::HttpProductsGateway;
pub use gateway::memory::InMemoryProductsGateway;
pub use gateway::{FieldViolation, GatewayError, GatewayOp, GatewayResult, ProductsGateway};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::date::{derive_revision_date, parse_local_date, DateError};
pub use model::product::{Product, ProductId, ProductUpdate};
pub use route::{FormRequest, Navigation, Route};
pub use state::form::{FormMode, FormView, ProductFormState, SubmitOutcome, SubmitRequest};
pub use state::list::{DeleteOutcome, ListView, ListViewState, ProductListState};
pub use validation::id_check::{IdAvailability, IdCheckTicket};
pub use validation::{FieldError, ProductField};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
