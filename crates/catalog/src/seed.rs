//! Initial catalog contents.

use std::path::Path;

use crate::error::SeedError;
use crate::product::Product;
use crate::store::CatalogStore;

const DEFAULT_PRODUCTS: &str = include_str!("../data/products.json");

/// Parses a JSON array of products.
///
/// Prices that do not fit in cents are rejected here; id uniqueness and
/// price bounds are checked when the catalog is built.
pub fn parse_products(json: &str) -> Result<Vec<Product>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads products from a JSON seed file.
pub fn load_products(path: &Path) -> Result<Vec<Product>, SeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_products(&json)
}

/// The catalog bundled with the service.
pub fn default_products() -> Result<Vec<Product>, SeedError> {
    parse_products(DEFAULT_PRODUCTS)
}

/// Builds the catalog from `path`, or from the bundled products when no
/// path is given.
#[tracing::instrument]
pub fn load_catalog(path: Option<&Path>) -> Result<CatalogStore, SeedError> {
    let products = match path {
        Some(path) => load_products(path)?,
        None => default_products()?,
    };
    tracing::info!(products = products.len(), "catalog seeded");
    CatalogStore::new(products)
}
