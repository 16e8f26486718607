//! Static product catalog.
//!
//! The table is read-only after start-up and shared by every session. It only
//! populates selection controls; the one rule it enforces is "a chosen value
//! must be one of the listed options".

use crate::domain::{
    Attribute, Material, ProductCatalogEntry, Selections,
    UnitOfMeasure::{LinearFt, Piece, SqFt},
};
use crate::error::AppError;

const ROUND_DIAMETERS: &[&str] = &["6\"", "8\"", "10\"", "12\""];
const ROUND_SIZES: &[&str] = &["6\"", "8\"", "10\"", "12\""];

pub static CATALOG: &[ProductCatalogEntry] = &[
    ProductCatalogEntry {
        name: "Rectangular Duct",
        unit: SqFt,
        material: Material::GalvanizedSteel,
        attributes: &[
            Attribute { name: "thickness", options: &["24 ga", "22 ga", "20 ga"] },
            Attribute { name: "dimensions", options: &["12\"x8\"", "16\"x10\"", "20\"x12\""] },
        ],
    },
    ProductCatalogEntry {
        name: "Round Pipes",
        unit: LinearFt,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "diameter", options: ROUND_DIAMETERS }],
    },
    ProductCatalogEntry {
        name: "Elbows",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[
            Attribute { name: "angle", options: &["45°", "90°"] },
            Attribute { name: "diameter", options: ROUND_DIAMETERS },
        ],
    },
    ProductCatalogEntry {
        name: "Reducers",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "size", options: &["8\"x6\"", "10\"x8\"", "12\"x10\""] }],
    },
    ProductCatalogEntry {
        name: "Dampers",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[
            Attribute { name: "type", options: &["Manual", "Motorized"] },
            Attribute { name: "size", options: ROUND_SIZES },
        ],
    },
    ProductCatalogEntry {
        name: "Boots",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[
            Attribute { name: "type", options: &["Side", "End"] },
            Attribute { name: "size", options: &["6\"x10\"", "8\"x12\"", "10\"x12\""] },
        ],
    },
    ProductCatalogEntry {
        name: "Take Offs",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "size", options: ROUND_SIZES }],
    },
    ProductCatalogEntry {
        name: "Spiral Pipes",
        unit: LinearFt,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "diameter", options: ROUND_DIAMETERS }],
    },
    ProductCatalogEntry {
        name: "Flex Pipes",
        unit: LinearFt,
        material: Material::Aluminum,
        attributes: &[Attribute { name: "diameter", options: ROUND_DIAMETERS }],
    },
    ProductCatalogEntry {
        name: "Caps",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "diameter", options: ROUND_DIAMETERS }],
    },
    ProductCatalogEntry {
        name: "Tees",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "size", options: ROUND_SIZES }],
    },
    ProductCatalogEntry {
        name: "Collars",
        unit: Piece,
        material: Material::GalvanizedSteel,
        attributes: &[Attribute { name: "diameter", options: ROUND_DIAMETERS }],
    },
    ProductCatalogEntry {
        name: "Insulation Sleeves",
        unit: LinearFt,
        material: Material::Fiberglass,
        attributes: &[
            Attribute { name: "thickness", options: &["1\"", "1.5\"", "2\""] },
            Attribute { name: "diameter", options: ROUND_DIAMETERS },
        ],
    },
];

/// Look up a product by name (case-insensitive).
pub fn find_product(name: &str) -> Option<&'static ProductCatalogEntry> {
    let name = name.trim();
    CATALOG.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Look up a product or fail with the list of known names.
pub fn require_product(name: &str) -> Result<&'static ProductCatalogEntry, AppError> {
    find_product(name).ok_or_else(|| {
        let known: Vec<&str> = CATALOG.iter().map(|p| p.name).collect();
        AppError::validation(format!(
            "Unknown product '{name}'. Known products: {}.",
            known.join(", ")
        ))
    })
}

/// First option of every attribute.
pub fn default_selections(entry: &ProductCatalogEntry) -> Selections {
    entry
        .attributes
        .iter()
        .filter_map(|a| a.options.first().map(|v| (a.name.to_string(), v.to_string())))
        .collect()
}

/// Validate `selections` against `entry` and fill unspecified attributes with defaults.
///
/// Attribute names match case-insensitively and are normalized to the catalog
/// spelling; option values must match exactly.
pub fn resolve_selections(
    entry: &ProductCatalogEntry,
    selections: &Selections,
) -> Result<Selections, AppError> {
    let mut resolved = default_selections(entry);

    for (name, value) in selections {
        let attribute = entry.attribute(name).ok_or_else(|| {
            let known: Vec<&str> = entry.attributes.iter().map(|a| a.name).collect();
            AppError::validation(format!(
                "'{}' has no attribute '{name}' (expected one of: {}).",
                entry.name,
                known.join(", ")
            ))
        })?;

        if !attribute.allows(value) {
            return Err(AppError::validation(format!(
                "Invalid {} '{value}' for {} (expected one of: {}).",
                attribute.name,
                entry.name,
                attribute.options.join(", ")
            )));
        }

        resolved.insert(attribute.name.to_string(), value.clone());
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitOfMeasure;
    use crate::error::ErrorKind;

    #[test]
    fn catalog_has_thirteen_unique_products() {
        assert_eq!(CATALOG.len(), 13);
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(!a.attributes.is_empty(), "{} has no attributes", a.name);
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let entry = find_product("flex pipes").unwrap();
        assert_eq!(entry.name, "Flex Pipes");
        assert_eq!(entry.unit, UnitOfMeasure::LinearFt);
        assert_eq!(entry.material, Material::Aluminum);
        assert!(find_product("Chimney").is_none());
    }

    #[test]
    fn defaults_pick_first_option() {
        let entry = find_product("Insulation Sleeves").unwrap();
        let defaults = default_selections(entry);
        assert_eq!(defaults.get("thickness").map(String::as_str), Some("1\""));
        assert_eq!(defaults.get("diameter").map(String::as_str), Some("6\""));
    }

    #[test]
    fn resolve_rejects_values_outside_the_list() {
        let entry = find_product("Elbows").unwrap();

        let mut ok = Selections::new();
        ok.insert("Angle".to_string(), "90°".to_string());
        let resolved = resolve_selections(entry, &ok).unwrap();
        assert_eq!(resolved.get("angle").map(String::as_str), Some("90°"));
        assert_eq!(resolved.get("diameter").map(String::as_str), Some("6\""));

        let mut bad_value = Selections::new();
        bad_value.insert("angle".to_string(), "30°".to_string());
        let err = resolve_selections(entry, &bad_value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let mut bad_name = Selections::new();
        bad_name.insert("thickness".to_string(), "24 ga".to_string());
        assert!(resolve_selections(entry, &bad_name).is_err());
    }

    #[test]
    fn unknown_product_lists_known_names() {
        let err = require_product("Chimney").unwrap_err();
        assert!(err.message().contains("Rectangular Duct"));
    }
}
