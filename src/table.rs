//! Recipe table construction and per-row breakdown resolution
//!
//! A table is built one recipe at a time: the row shell is constructed, its
//! breakdown for quantity 1 is resolved, the row is attached, and only then
//! does the next recipe start. At most one initial resolution is in flight,
//! so initial render latency grows with one round trip per recipe.
//!
//! After rendering, each row is an independent handle. Committing a new
//! quantity on a row re-resolves that row only; edits on different rows may
//! run concurrently. Two edits on the same row are not sequenced: both
//! requests are issued and whichever response lands last fills the cells.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::models::{Breakdown, Recipe, ViewKind};
use crate::names::FriendlyNames;
use crate::parser::coerce_quantity;
use crate::resolver::BreakdownResolver;

/// Breakdown cell text while the first resolution is pending
pub const CALCULATING: &str = "Calculating...";
/// Cell text for an empty breakdown or missing-recipe list
pub const NONE: &str = "None";
/// Cell text for a failed resolution when errors are surfaced
pub const ERROR: &str = "Error";

const UNNAMED: &str = "Unnamed Recipe";
const NO_MATERIALS: &str = "No materials specified";
const DELETE_CONTROL: &str = "X";

/// The two cells filled from a breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownCells {
    pub raw_materials: String,
    pub missing_recipes: String,
}

impl BreakdownCells {
    fn pending() -> Self {
        Self {
            raw_materials: CALCULATING.to_string(),
            missing_recipes: NONE.to_string(),
        }
    }

    fn error() -> Self {
        Self {
            raw_materials: ERROR.to_string(),
            missing_recipes: ERROR.to_string(),
        }
    }
}

/// Shared, read-only collaborators of every row
struct Pipeline {
    resolver: Arc<dyn BreakdownResolver>,
    names: Arc<FriendlyNames>,
    surface_errors: bool,
}

impl Pipeline {
    async fn breakdown_cells(&self, recipe_id: &str, quantity: u64) -> BreakdownCells {
        if !self.surface_errors {
            let breakdown = self.resolver.resolve(recipe_id, quantity).await;
            return self.format_breakdown(&breakdown);
        }

        match self.resolver.try_resolve(recipe_id, quantity).await {
            Ok(breakdown) => self.format_breakdown(&breakdown),
            Err(e) => {
                warn!("Error calculating raw materials for {} (x{}): {}", recipe_id, quantity, e);
                BreakdownCells::error()
            }
        }
    }

    fn format_breakdown(&self, breakdown: &Breakdown) -> BreakdownCells {
        let raw = self.names.format_materials(&breakdown.raw_materials);
        let missing = self.names.format_keys(&breakdown.missing_recipes);

        BreakdownCells {
            raw_materials: if raw.is_empty() { NONE.to_string() } else { raw },
            missing_recipes: if missing.is_empty() { NONE.to_string() } else { missing },
        }
    }
}

#[derive(Debug)]
struct RowState {
    quantity: u64,
    cells: BreakdownCells,
}

/// Handle to one displayed recipe row
///
/// Clones share the same row state.
#[derive(Clone)]
pub struct RecipeRow {
    recipe_id: String,
    name: String,
    materials_summary: String,
    deletable: bool,
    state: Arc<Mutex<RowState>>,
    pipeline: Arc<Pipeline>,
}

impl RecipeRow {
    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn materials_summary(&self) -> &str {
        &self.materials_summary
    }

    /// Recipe id the row's delete control targets, if the row has one
    pub fn delete_target(&self) -> Option<&str> {
        self.deletable.then_some(self.recipe_id.as_str())
    }

    pub fn quantity(&self) -> u64 {
        self.lock().quantity
    }

    pub fn cells(&self) -> BreakdownCells {
        self.lock().cells.clone()
    }

    /// Apply a committed quantity edit and re-resolve this row
    ///
    /// Input without a positive leading integer counts as 1. Returns the
    /// cells this edit produced; a later-landing edit may overwrite them.
    pub async fn commit_quantity(&self, input: &str) -> BreakdownCells {
        let quantity = coerce_quantity(input);
        self.lock().quantity = quantity;
        debug!("Quantity for {} set to {}", self.recipe_id, quantity);
        self.resolve_quantity(quantity).await
    }

    async fn resolve_quantity(&self, quantity: u64) -> BreakdownCells {
        let cells = self.pipeline.breakdown_cells(&self.recipe_id, quantity).await;
        self.lock().cells = cells.clone();
        cells
    }

    fn lock(&self) -> MutexGuard<'_, RowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cell_texts(&self) -> Vec<String> {
        let state = self.lock();
        let mut cells = Vec::with_capacity(6);
        if self.deletable {
            cells.push(DELETE_CONTROL.to_string());
        }
        cells.push(self.name.clone());
        cells.push(self.materials_summary.clone());
        cells.push(state.quantity.to_string());
        cells.push(state.cells.raw_materials.clone());
        cells.push(state.cells.missing_recipes.clone());
        cells
    }
}

impl fmt::Debug for RecipeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeRow")
            .field("recipe_id", &self.recipe_id)
            .field("name", &self.name)
            .field("deletable", &self.deletable)
            .field("state", &*self.lock())
            .finish()
    }
}

impl fmt::Display for RecipeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        write!(
            f,
            "{} x{}: {} (missing recipes: {})",
            self.name, state.quantity, state.cells.raw_materials, state.cells.missing_recipes
        )
    }
}

/// A rendered recipe table
#[derive(Debug)]
pub struct RecipeTable {
    view: ViewKind,
    rows: Vec<RecipeRow>,
}

impl RecipeTable {
    pub fn title(&self) -> &'static str {
        self.view.title()
    }

    /// Column headings; `Delete` only appears in the custom view
    pub fn header(&self) -> Vec<&'static str> {
        let mut header = Vec::with_capacity(6);
        if self.view.has_delete_column() {
            header.push("Delete");
        }
        header.extend([
            "Item",
            "Items Required",
            "Quantity",
            "Raw Material Breakdown",
            "Missing Recipes",
        ]);
        header
    }

    pub fn rows(&self) -> &[RecipeRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RecipeRow> {
        self.rows.get(index)
    }

    pub fn find(&self, recipe_id: &str) -> Option<&RecipeRow> {
        self.rows.iter().find(|row| row.recipe_id == recipe_id)
    }
}

impl fmt::Display for RecipeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title())?;

        let mut lines: Vec<Vec<String>> = vec![
            std::iter::once("#".to_string())
                .chain(self.header().into_iter().map(str::to_string))
                .collect(),
        ];
        for (i, row) in self.rows.iter().enumerate() {
            lines.push(
                std::iter::once((i + 1).to_string())
                    .chain(row.cell_texts())
                    .collect(),
            );
        }

        let mut widths = vec![0; lines[0].len()];
        for line in &lines {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for (n, line) in lines.iter().enumerate() {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())?;

            if n == 0 {
                let total = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
                writeln!(f, "{}", "-".repeat(total))?;
            }
        }

        if self.rows.is_empty() {
            writeln!(f, "(no recipes)")?;
        }
        Ok(())
    }
}

/// Builds recipe tables and wires per-row recomputation
pub struct TableRenderer {
    resolver: Arc<dyn BreakdownResolver>,
    names: Arc<FriendlyNames>,
    surface_errors: bool,
}

impl TableRenderer {
    pub fn new(resolver: Arc<dyn BreakdownResolver>, names: Arc<FriendlyNames>) -> Self {
        Self {
            resolver,
            names,
            surface_errors: false,
        }
    }

    /// Show `Error` in a row's breakdown cells when its resolution fails
    ///
    /// Off by default, in which case a failure renders like an empty
    /// breakdown.
    pub fn surface_resolver_errors(mut self, enabled: bool) -> Self {
        self.surface_errors = enabled;
        self
    }

    /// Render `recipes` in order, resolving each row before starting the next
    pub async fn render(&self, recipes: &[Recipe], view: ViewKind) -> RecipeTable {
        debug!(
            "Rendering {} {} recipes with {} resolver",
            recipes.len(),
            view,
            self.resolver.name()
        );

        let pipeline = Arc::new(Pipeline {
            resolver: Arc::clone(&self.resolver),
            names: Arc::clone(&self.names),
            surface_errors: self.surface_errors,
        });

        let mut table = RecipeTable {
            view,
            rows: Vec::with_capacity(recipes.len()),
        };

        for recipe in recipes {
            let row = row_shell(recipe, view, &pipeline);
            row.resolve_quantity(1).await;
            table.rows.push(row);
        }

        table
    }
}

/// Row with placeholder breakdown cells and quantity 1
fn row_shell(recipe: &Recipe, view: ViewKind, pipeline: &Arc<Pipeline>) -> RecipeRow {
    let name = if recipe.name.is_empty() {
        UNNAMED.to_string()
    } else {
        recipe.name.clone()
    };

    let summary = pipeline.names.format_materials(&recipe.materials);
    let materials_summary = if summary.is_empty() {
        NO_MATERIALS.to_string()
    } else {
        summary
    };

    RecipeRow {
        recipe_id: recipe.id.clone(),
        name,
        materials_summary,
        deletable: view.has_delete_column(),
        state: Arc::new(Mutex::new(RowState {
            quantity: 1,
            cells: BreakdownCells::pending(),
        })),
        pipeline: Arc::clone(pipeline),
    }
}
