//! Integration tests for the JSON store and filesystem helpers
//!
//! Organizations are kept in the JSON store and exported as a CSV report in
//! the output directory.

use std::sync::Arc;
use std::thread;

use helpkit_domain::{HelpkitError, Organization, Table};
use helpkit_infra::storage::files::{checksum, create_output_file, dir_size, list_files};
use helpkit_infra::JsonDb;
use tempfile::TempDir;

fn organizations() -> Vec<Organization> {
    vec![
        Organization::new("Exemple SA").with_siren("732829320").with_locality("75002", "Paris", "FR"),
        Organization::new("Modèle SARL").with_siren("404833048").with_locality("69001", "Lyon", "FR"),
    ]
}

/// Test organizations round-trip through the store and end up in a report
#[test]
fn test_store_then_export_report() {
    let dir = TempDir::new().expect("temp dir");
    let db = JsonDb::open(dir.path().join("db")).expect("store");

    for organization in organizations() {
        let siren = organization.siren().expect("sample has a SIREN").to_string();
        db.put(&format!("organizations/{siren}"), &organization).expect("stored");
    }
    assert_eq!(db.list().unwrap(), vec!["organizations/404833048", "organizations/732829320"]);

    let mut table = Table::new(["siren", "name", "city"]);
    for name in db.list().unwrap() {
        let organization: Organization = db.get(&name).unwrap().expect("listed document exists");
        table.add_row([
            organization.siren().unwrap_or_default().to_string(),
            organization.name().to_string(),
            organization.city.clone().unwrap_or_default(),
        ]);
    }

    let output_dir = dir.path().join("output");
    let report = create_output_file(&output_dir, "organizations.csv", table.to_csv(';').as_bytes())
        .expect("report written");

    assert_eq!(report.name, "organizations.csv");
    assert_eq!(report.mime_type, "text/csv");
    assert_eq!(report.checksum, Some(checksum(report.path()).unwrap()));
    assert_eq!(dir_size(&output_dir).unwrap(), report.size);

    let contents = std::fs::read_to_string(report.path()).unwrap();
    assert_eq!(
        contents,
        "siren;name;city\n404833048;Modèle SARL;Lyon\n732829320;Exemple SA;Paris\n"
    );
    assert_eq!(list_files(&output_dir, Some("csv")).unwrap(), vec![report.path.clone()]);
}

/// Test the shared store is one instance across threads
#[test]
fn test_shared_store_across_threads() {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().to_path_buf();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let root = root.clone();
            thread::spawn(move || {
                let db = JsonDb::shared(&root).expect("shared store");
                db.put(&format!("worker-{i}"), &i).expect("stored");
                db
            })
        })
        .collect();

    let stores: Vec<Arc<JsonDb>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(stores.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(stores[0].list().unwrap().len(), 4);
    assert_eq!(stores[0].get::<u32>("worker-3").unwrap(), Some(3));
}

/// Test names cannot reach outside the store
#[test]
fn test_store_refuses_traversal() {
    let dir = TempDir::new().expect("temp dir");
    let db = JsonDb::open(dir.path().join("db")).expect("store");
    std::fs::write(dir.path().join("secret.json"), "{\"token\": \"x\"}").unwrap();

    assert!(matches!(db.get_value("../secret"), Err(HelpkitError::Security(_))));
    assert!(matches!(db.delete("../secret"), Err(HelpkitError::Security(_))));
    assert!(dir.path().join("secret.json").exists());
}
