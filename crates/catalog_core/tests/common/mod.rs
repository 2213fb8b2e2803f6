#![allow(dead_code)]

use catalog_core::Product;
use chrono::NaiveDate;

pub fn product(id: &str, name: &str, description: &str, release: &str, revision: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        logo: format!("assets-{id}.png"),
        date_release: release.to_string(),
        date_revision: revision.to_string(),
    }
}

/// Six-product catalog used across list and form tests.
pub fn catalog() -> Vec<Product> {
    vec![
        product(
            "uno",
            "Tarjeta Crédito",
            "Producto para compras a crédito.",
            "2025-01-01",
            "2026-01-01",
        ),
        product(
            "dos",
            "Cuenta Ahorros",
            "Cuenta para ahorro y retiros.",
            "2024-06-15",
            "2025-06-15",
        ),
        product(
            "tres",
            "Crédito Libre Inversión",
            "Préstamo para múltiples propósitos.",
            "2023-10-20",
            "2024-10-20",
        ),
        product("cuatro", "CDT", "Inversión a término fijo.", "2022-02-01", "2023-02-01"),
        product(
            "cinco",
            "Seguro de Vida",
            "Cobertura ante eventualidades.",
            "2021-08-12",
            "2022-08-12",
        ),
        product("seis", "Leasing", "Financiación de activos.", "2020-03-05", "2021-03-05"),
    ]
}

/// Fixed clock for date validation.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid fixed date")
}
