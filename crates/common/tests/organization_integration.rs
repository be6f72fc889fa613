//! Integration tests for French company identifiers
//!
//! SIREN/SIRET checks, VAT derivation and NAF lookups on sample
//! organizations

use helpkit_common::organization::{
    format_siret, intracom_vat, is_valid_siren, is_valid_siret, naf_division_label, naf_section,
    siren_from_siret,
};
use helpkit_common::vat::VatNumber;

mod data;
use data::samples::{full_organization, siren_only_organization};

/// Test every identifier of a complete organization is consistent
#[test]
fn test_identifiers_are_consistent() {
    let org = full_organization();
    let siret = org.siret().unwrap();

    assert!(is_valid_siret(siret));
    assert_eq!(siren_from_siret(siret).as_deref(), org.siren());
    assert!(is_valid_siren(org.siren().unwrap()));
    assert_eq!(org.establishment_number(), Some("00013"));
    assert_eq!(format_siret(siret).as_deref(), Some("855 200 887 00013"));
}

/// Test the derived VAT number passes the VAT syntax and key check
#[test]
fn test_derived_vat_number_parses() {
    let vat = intracom_vat(&full_organization()).unwrap();
    assert_eq!(vat, "FR09855200887");

    let parsed = VatNumber::parse(&vat).unwrap();
    assert_eq!(parsed.country_code(), "FR");
    assert_eq!(parsed.number(), "09855200887");

    assert_eq!(intracom_vat(&siren_only_organization()).as_deref(), Some("FR84055804124"));
}

/// Test a stored VAT number takes precedence over the derived one
#[test]
fn test_stored_vat_number_wins() {
    let org = siren_only_organization().with_vat_number("FRK7399859412");
    assert_eq!(intracom_vat(&org).as_deref(), Some("FRK7399859412"));
}

/// Test the SIRET alone is enough to derive the VAT number
#[test]
fn test_vat_from_siret_only() {
    let mut org = full_organization();
    org.siren = None;
    assert_eq!(intracom_vat(&org).as_deref(), Some("FR09855200887"));
}

/// Test NAF lookups for the sample activity code
#[test]
fn test_naf_lookup() {
    let org = full_organization();
    let naf = org.naf().unwrap();

    assert_eq!(naf_division_label(naf), Some("Activités des sièges sociaux ; conseil de gestion"));
    assert_eq!(naf_section(naf), Some('M'));
}
