//! Recipe catalog operations

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{CatalogError, Result};
use crate::models::{CatalogKind, Recipe, ViewKind};
use crate::parser::{canonicalize, parse_materials};

/// List, create and delete recipes in the external catalog
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<Recipe>>;

    /// Create or replace a recipe
    async fn create(&self, recipe: &Recipe) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Base recipes followed by custom recipes
    async fn list_all(&self) -> Result<Vec<Recipe>> {
        let mut recipes = self.list(CatalogKind::Base).await?;
        recipes.extend(self.list(CatalogKind::Custom).await?);
        Ok(recipes)
    }
}

/// Fetch the recipes shown by a view
pub async fn fetch_view<C: RecipeCatalog + ?Sized>(catalog: &C, view: ViewKind) -> Result<Vec<Recipe>> {
    match view {
        ViewKind::Base => catalog.list(CatalogKind::Base).await,
        ViewKind::Custom => catalog.list(CatalogKind::Custom).await,
        ViewKind::All => catalog.list_all().await,
    }
}

/// Build a custom recipe from a name and a free-text material list
///
/// The id is the canonical form of the name.
pub fn build_recipe(name: &str, materials_text: &str) -> Result<Recipe> {
    let name = name.trim();
    let materials_text = materials_text.trim();
    if name.is_empty() || materials_text.is_empty() {
        return Err(CatalogError::MissingInput);
    }

    let materials = parse_materials(materials_text);
    if materials.is_empty() {
        warn!("No materials recognized in '{}'", materials_text);
    }

    Ok(Recipe {
        id: canonicalize(name),
        name: name.to_string(),
        materials,
    })
}

/// Parse and submit a new custom recipe
pub async fn create_recipe<C: RecipeCatalog + ?Sized>(
    catalog: &C,
    name: &str,
    materials_text: &str,
) -> Result<Recipe> {
    let recipe = build_recipe(name, materials_text)?;
    catalog.create(&recipe).await?;
    info!("Created recipe '{}' ({} materials)", recipe.id, recipe.materials.len());
    Ok(recipe)
}
