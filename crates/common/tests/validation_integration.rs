//! Integration tests for the validation module
//!
//! A company sign-up form validated end to end, then shaped for an API
//! response

use helpkit_common::password::PasswordStrength;
use helpkit_common::validation::{
    errors_to_flat_map, errors_to_tree, CollectionValidator, EmailValidator, HexColorValidator,
    NafValidator, PasswordStrengthValidator, PhoneValidator, SirenValidator, SiretValidator,
    StringValidator, UrlValidator, ValidationContext, Validator, VatNumberValidator,
};
use helpkit_domain::{HelpkitError, Organization};
use serde_json::json;

mod data;
use data::samples::full_organization;

struct SignUp {
    organization: Organization,
    email: String,
    phone: String,
    website: String,
    password: String,
    brand_color: String,
    tags: Vec<String>,
}

fn valid_sign_up() -> SignUp {
    SignUp {
        organization: full_organization(),
        email: "contact@michelin.example".into(),
        phone: "04 73 32 20 00".into(),
        website: "https://www.michelin.example".into(),
        password: "Xk9#mQ2$vL7!pR4&".into(),
        brand_color: "#27509b".into(),
        tags: vec!["tyres".into(), "mobility".into()],
    }
}

fn validate(form: &SignUp, context: ValidationContext) -> Validator {
    let mut validator = Validator::with_context(context);
    let org = &form.organization;

    validator.validate_nested("organization", |v| {
        v.validate_field("name", org.name(), &StringValidator::new().not_empty().max_length(100));
        v.validate_field("siren", org.siren().unwrap_or_default(), &SirenValidator::new().required());
        v.validate_field("siret", org.siret().unwrap_or_default(), &SiretValidator::new());
        v.validate_field("naf", org.naf().unwrap_or_default(), &NafValidator::new());
        v.validate_field("vat_number", org.vat_number().unwrap_or_default(), &VatNumberValidator::new());
    });
    validator
        .validate_field("email", &form.email, &EmailValidator::new())
        .validate_field("phone", &form.phone, &PhoneValidator::new("FR").required())
        .validate_field("website", &form.website, &UrlValidator::new().require_https())
        .validate_field(
            "password",
            &form.password,
            &PasswordStrengthValidator::new(PasswordStrength::Strong).required(),
        )
        .validate_field("brand_color", &form.brand_color, &HexColorValidator::new())
        .validate_field(
            "tags",
            &form.tags,
            &CollectionValidator::<String>::new().max_size(5).unique_items().item_validator(
                StringValidator::new().pattern(r"^[a-z-]+$").expect("valid tag pattern"),
            ),
        );
    validator
}

/// Test a complete, correct form passes
#[test]
fn test_valid_form_passes() {
    let validator = validate(&valid_sign_up(), ValidationContext::new());
    assert!(!validator.has_errors(), "{}", validator.errors());
    assert!(validator.finalize().is_ok());
}

/// Test every broken field is reported under its path
#[test]
fn test_invalid_form_reports_each_field() {
    let mut form = valid_sign_up();
    form.organization = Organization::new("")
        .with_siren("855200888")
        .with_naf("04.11Z")
        .with_vat_number("FR10855200887");
    form.email = "contact@".into();
    form.phone = "".into();
    form.website = "http://michelin.example".into();
    form.password = "password".into();
    form.brand_color = "blue".into();
    form.tags = vec!["tyres".into(), "tyres".into()];

    let errors = validate(&form, ValidationContext::new()).finalize().unwrap_err();
    let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "organization.name",
            "organization.siren",
            "organization.naf",
            "organization.vat_number",
            "email",
            "phone",
            "website",
            "password",
            "brand_color",
            "tags",
        ]
    );

    let tree = errors_to_tree(&errors);
    assert_eq!(tree["organization"]["siren"], json!(["This value is not a valid SIREN number"]));
    assert_eq!(tree["phone"], json!(["This value should not be blank"]));

    let flat = errors_to_flat_map(&errors);
    assert_eq!(flat["website"], json!("URL must use HTTPS"));
    assert_eq!(flat["tags"], json!("Collection must contain unique items"));
}

/// Test stop-on-first keeps only the first failure
#[test]
fn test_stop_on_first_error() {
    let mut form = valid_sign_up();
    form.email = "nope".into();
    form.brand_color = "nope".into();

    let validator = validate(&form, ValidationContext::new().stop_on_first_error());
    assert_eq!(validator.error_count(), 1);
    assert_eq!(validator.errors().errors[0].field, "email");
}

/// Test validation errors convert into the workspace error type
#[test]
fn test_errors_convert_to_helpkit_error() {
    let mut form = valid_sign_up();
    form.brand_color = "#12345".into();

    let err: HelpkitError = validate(&form, ValidationContext::new()).finalize().unwrap_err().into();
    assert_eq!(
        err,
        HelpkitError::InvalidInput(
            "Validation failed: brand_color: This value is not a valid hexadecimal color".into()
        )
    );
}
