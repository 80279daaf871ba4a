//! Static product/user catalog
//!
//! Loaded once at startup from `<catalog_dir>/products.json` and
//! `<catalog_dir>/users.json`, then shared read-only for the process lifetime.
//! The catalog is embedded in the prompt and used to resolve the IDs the
//! model claims to have recognised.

use crate::models::{Product, User};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const PRODUCTS_FILE: &str = "products.json";
pub const USERS_FILE: &str = "users.json";

/// In-memory product and user reference lists
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    users: Vec<User>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, users: Vec<User>) -> Self {
        Self { products, users }
    }

    /// Load both record sets from a directory.
    ///
    /// A missing file is treated as an empty list; a file that exists but does
    /// not parse is an error, since the service would silently lose matches.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let products: Vec<Product> = read_records(&dir.join(PRODUCTS_FILE))?;
        let users: Vec<User> = read_records(&dir.join(USERS_FILE))?;

        log::info!(
            "[catalog] Loaded {} products and {} users from {}",
            products.len(),
            users.len(),
            dir.display()
        );

        Ok(Self::new(products, users))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Exact ID match
    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Users whose ID appears in `ids`, in catalog order.
    /// Unknown IDs are dropped.
    pub fn resolve_users(&self, ids: &[String]) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| ids.iter().any(|id| *id == u.id))
            .cloned()
            .collect()
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        log::warn!(
            "[catalog] {} not found, continuing with an empty list",
            path.display()
        );
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read catalog file '{}': {}", path.display(), e))?;

    serde_json::from_str(&contents)
        .map_err(|e| anyhow!("Failed to parse catalog file '{}': {}", path.display(), e))
}
