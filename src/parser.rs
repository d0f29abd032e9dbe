//! Free-text material specification parser
//!
//! Turns input such as `"iron plates: 5, 3 gear"` into a canonical
//! [`MaterialMap`]. Two clause forms are recognized and may be mixed freely
//! within one input:
//!
//! - `<quantity> <material-name>`, e.g. `3 gear`
//! - `<material-name>: <quantity>`, e.g. `iron plates: 5`
//!
//! The input is scanned left to right. At each position the quantity-first
//! form is tried before the name-first form, and the leftmost match wins.
//! Clauses are applied in scan order, so a material named twice keeps the
//! quantity of its last occurrence. Anything matching neither form is
//! skipped without error.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{MaterialKey, MaterialMap};

/// Both clause forms as one alternation; `qty_first`/`name_first` and
/// `name_last`/`qty_last` capture the two halves of each form.
static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<qty_first>[0-9]+)\s*(?P<name_last>[a-zA-Z\s]+)|(?P<name_first>[a-zA-Z\s]+):\s*(?P<qty_last>[0-9]+)",
    )
    .expect("material clause pattern is valid")
});

/// Parse a free-text material list into a canonical quantity map
///
/// Never fails. Clauses whose name is blank or whose quantity is zero (or
/// too large to represent) are treated as non-matches.
pub fn parse_materials(input: &str) -> MaterialMap {
    let mut materials = MaterialMap::new();

    for cap in CLAUSE_RE.captures_iter(input) {
        let (qty, name) = match (cap.name("qty_first"), cap.name("name_last")) {
            (Some(qty), Some(name)) => (qty.as_str(), name.as_str()),
            _ => match (cap.name("qty_last"), cap.name("name_first")) {
                (Some(qty), Some(name)) => (qty.as_str(), name.as_str()),
                _ => continue,
            },
        };

        let key = canonicalize(name);
        if key.is_empty() {
            continue;
        }

        match qty.parse::<u64>() {
            Ok(quantity) if quantity > 0 => {
                materials.insert(key, quantity);
            }
            _ => continue,
        }
    }

    materials
}

/// Canonical key for a material or recipe name
///
/// Trims, lower-cases, and joins whitespace-separated words with a single
/// underscore. Idempotent.
pub fn canonicalize(name: &str) -> MaterialKey {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Coerce a quantity edit into a positive integer
///
/// Reads the leading integer of the input the way a lenient number field
/// would (`"3abc"` and `"2.5"` give their integer prefix). Anything without
/// a positive leading integer becomes 1.
pub fn coerce_quantity(input: &str) -> u64 {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let digits: &str = {
        let end = unsigned
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(unsigned.len());
        &unsigned[..end]
    };

    match digits.parse::<u64>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u64)]) -> MaterialMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_materials("").is_empty());
        assert!(parse_materials("   \n\t ").is_empty());
    }

    #[test]
    fn test_name_first_clauses() {
        assert_eq!(
            parse_materials("iron plates: 5, copper: 10"),
            map(&[("iron_plates", 5), ("copper", 10)])
        );
    }

    #[test]
    fn test_quantity_first_clause() {
        assert_eq!(parse_materials("3 gear"), map(&[("gear", 3)]));
    }

    #[test]
    fn test_mixed_clause_forms() {
        assert_eq!(
            parse_materials("2 iron plate, copper cable: 3; 1 steel"),
            map(&[("iron_plate", 2), ("copper_cable", 3), ("steel", 1)])
        );
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        assert_eq!(parse_materials("copper: 1, copper: 4"), map(&[("copper", 4)]));
        assert_eq!(parse_materials("4 Copper, copper: 2"), map(&[("copper", 2)]));
    }

    #[test]
    fn test_unmatched_text_is_skipped() {
        assert_eq!(
            parse_materials("??? gear: 2 !!! nonsense, 7 copper"),
            map(&[("gear", 2), ("copper", 7)])
        );
        assert!(parse_materials("just some words").is_empty());
    }

    #[test]
    fn test_name_whitespace_collapsed() {
        assert_eq!(
            parse_materials("  Electronic   Circuit :3"),
            map(&[("electronic_circuit", 3)])
        );
    }

    #[test]
    fn test_blank_name_and_zero_quantity_skipped() {
        assert_eq!(parse_materials("5 , gear: 0, copper: 1"), map(&[("copper", 1)]));
    }

    #[test]
    fn test_oversized_quantity_skipped() {
        assert!(parse_materials("99999999999999999999999 gear").is_empty());
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("Iron Plate"), "iron_plate");
        assert_eq!(canonicalize("  Big   Red\tGear "), "big_red_gear");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_canonicalize_idempotent() {
        for name in ["iron_plate", "Iron Plate", "  a  b  ", "steel"] {
            let once = canonicalize(name);
            assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("4"), 4);
        assert_eq!(coerce_quantity(" 12 "), 12);
        assert_eq!(coerce_quantity("3abc"), 3);
        assert_eq!(coerce_quantity("2.5"), 2);
        assert_eq!(coerce_quantity("+6"), 6);
        assert_eq!(coerce_quantity("abc"), 1);
        assert_eq!(coerce_quantity(""), 1);
        assert_eq!(coerce_quantity("0"), 1);
        assert_eq!(coerce_quantity("-3"), 1);
    }
}
