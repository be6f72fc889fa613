//! Sample organizations and JSON rows
//!
//! Identifiers below carry valid Luhn keys.

use helpkit_domain::Organization;
use serde_json::{json, Value};

/// A company with every identifier filled in
#[allow(dead_code)]
pub fn full_organization() -> Organization {
    Organization::new("Michelin")
        .with_siren("855200887")
        .with_siret("85520088700013")
        .with_naf("70.10Z")
        .with_address_line("23 place des Carmes-Déchaux")
        .with_locality("63000", "Clermont-Ferrand", "FR")
}

/// A company known only by its SIREN
#[allow(dead_code)]
pub fn siren_only_organization() -> Organization {
    Organization::new("Bolloré").with_siren("055804124")
}

/// Rows with mixed-case names, numbered file names and nested children
#[allow(dead_code)]
pub fn catalog_rows() -> Vec<Value> {
    vec![
        json!({"name": "file10.txt", "category": "docs", "size": 120, "children": [
            {"name": "b", "size": 2},
            {"name": "a", "size": 1},
        ]}),
        json!({"name": "File2.txt", "category": "docs", "size": 80}),
        json!({"name": "file1.txt", "category": "images", "size": 80}),
        json!({"name": "archive.zip", "category": "archives", "size": null}),
    ]
}
