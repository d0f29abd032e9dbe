//! Data models for recipes and raw material breakdowns

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical material identifier (lower-case, underscore-joined)
pub type MaterialKey = String;

/// Material quantities keyed by canonical material key
pub type MaterialMap = BTreeMap<MaterialKey, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub materials: MaterialMap,
}

/// Fully expanded raw material cost of a recipe at some quantity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_materials: MaterialMap,
    /// Materials with no known recipe to expand further
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_recipes: BTreeSet<MaterialKey>,
}

/// Treat an explicit `null` like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.raw_materials.is_empty() && self.missing_recipes.is_empty()
    }
}

/// Which slice of the catalog a table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Base,
    Custom,
    All,
}

impl ViewKind {
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Base => "Base Recipes",
            ViewKind::Custom => "Custom Recipes",
            ViewKind::All => "All Recipes",
        }
    }

    /// Only custom recipes can be deleted from the table
    pub fn has_delete_column(self) -> bool {
        self == ViewKind::Custom
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViewKind::Base => "base",
            ViewKind::Custom => "custom",
            ViewKind::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(ViewKind::Base),
            "custom" => Ok(ViewKind::Custom),
            "all" => Ok(ViewKind::All),
            other => Err(format!("unknown view '{}', expected base, custom or all", other)),
        }
    }
}

/// The two catalog lists the server actually stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Base,
    Custom,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Base => "base",
            CatalogKind::Custom => "custom",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
