//! Product catalog commands.

use std::path::PathBuf;

use clap::Subcommand;
use wellday_core::Product;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List the catalog
    List,
    /// Products whose name starts with a prefix (case-insensitive)
    Search { prefix: String },
    /// Add one product (amounts per portion)
    Add {
        name: String,
        calories: f64,
        proteins: f64,
        fats: f64,
        carbs: f64,
    },
    /// Import a JSON array of products, skipping names already present
    Import { file: PathBuf },
}

pub fn run(action: ProductAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        ProductAction::List => print_json(tracker.products().products())?,
        ProductAction::Search { prefix } => print_json(&tracker.products().search(&prefix))?,
        ProductAction::Add {
            name,
            calories,
            proteins,
            fats,
            carbs,
        } => {
            tracker.add_product(Product::new(name, calories, proteins, fats, carbs))?;
            println!("{} products", tracker.products().products().len());
        }
        ProductAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let products: Vec<Product> = serde_json::from_str(&content)?;
            let added = tracker.import_products(products)?;
            println!("imported {added} products");
        }
    }
    Ok(())
}
