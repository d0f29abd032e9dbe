//! Friendly display names for materials

use std::borrow::Cow;
use std::collections::HashMap;

use crate::models::MaterialMap;
use crate::parser::canonicalize;

/// Built-in display names, overridable from the `[names]` config table
const DEFAULT_NAMES: &[(&str, &str)] = &[
    ("iron_plate", "Iron Plates"),
    ("gear", "Gears"),
    ("electronic_circuit", "Electronic Circuits"),
    ("copper", "Copper"),
    ("steel", "Steel"),
];

/// Read-only lookup from material key to display string
#[derive(Debug, Clone)]
pub struct FriendlyNames {
    names: HashMap<String, String>,
}

impl Default for FriendlyNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl FriendlyNames {
    /// A table with no entries; every lookup uses the fallback
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Built-in names overlaid with `overrides`
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        table.names.extend(overrides.into_iter().map(|(k, v)| {
            let key: String = k.into();
            (canonicalize(&key), v.into())
        }));
        table
    }

    /// Display name for a key, or the key with underscore runs turned into spaces
    pub fn display<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        match self.names.get(key) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(readable_key(key)),
        }
    }

    /// `"<name>: <qty>"` entries joined with `", "`; empty string for an empty map
    pub fn format_materials(&self, materials: &MaterialMap) -> String {
        materials
            .iter()
            .map(|(key, qty)| format!("{}: {}", self.display(key), qty))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Display names joined with `", "`
    pub fn format_keys<'a, I>(&self, keys: I) -> String
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter()
            .map(|key| self.display(key).into_owned())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn readable_key(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
