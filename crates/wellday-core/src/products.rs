//! Flat product catalog with prefix search.

use crate::ledger::FoodItem;

/// Catalog entries share the food item shape.
pub type Product = FoodItem;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Append the products whose name (ignoring ASCII case) is not in the
    /// catalog yet. Returns how many were added.
    pub fn import(&mut self, products: impl IntoIterator<Item = Product>) -> usize {
        let mut added = 0;
        for product in products {
            if self.find(&product.name).is_some() {
                continue;
            }
            self.products.push(product);
            added += 1;
        }
        added
    }

    /// Case-insensitive name prefix match.
    pub fn search(&self, prefix: &str) -> Vec<&Product> {
        let prefix = prefix.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&prefix))
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
