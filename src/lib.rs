//! Recipe Calculator
//!
//! Client for a crafting recipe catalog. Shows each recipe's expanded raw
//! material cost, delegating the expansion to an external resolver service,
//! and turns free-text material lists into canonical quantity maps for new
//! custom recipes.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod names;
pub mod parser;
pub mod resolver;
pub mod table;

pub use catalog::{RecipeCatalog, build_recipe, create_recipe, fetch_view};
pub use client::ApiClient;
pub use config::Config;
pub use error::{CatalogError, ResolveError};
pub use models::{Breakdown, CatalogKind, MaterialKey, MaterialMap, Recipe, ViewKind};
pub use names::FriendlyNames;
pub use parser::{canonicalize, coerce_quantity, parse_materials};
pub use resolver::BreakdownResolver;
pub use table::{BreakdownCells, RecipeRow, RecipeTable, TableRenderer};
