//! Validation framework
//!
//! [`Validator`] collects [`FieldError`]s for a whole form or payload;
//! individual checks implement [`FieldValidator`]. The generic validators
//! live in [`validators`], the French business identifiers and other
//! domain checks in [`constraints`], and [`form`] turns collected errors
//! into nested or flat maps for API responses.
use std::collections::HashMap;
use std::fmt;

use helpkit_domain::HelpkitError;
use serde::Serialize;

pub mod constraints;
pub mod form;
mod validators;

pub use constraints::{
    HexColorValidator, NafValidator, PasswordStrengthValidator, PhoneValidator, SirenValidator,
    SiretValidator, VatNumberValidator,
};
pub use form::{errors_to_flat_map, errors_to_tree};
pub use validators::{
    CollectionValidator, CustomValidator, EmailValidator, FieldValidator, RangeValidator,
    StringValidator, UrlValidator,
};

pub type ValidationResult<T> = Result<T, ValidationError>;

/// All field errors collected during one validation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn add_error_with_code(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.errors.push(FieldError::new(field, message).with_code(code));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors recorded for `field` (full dotted path)
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation failed"),
            [single] => write!(f, "Validation failed: {}: {}", single.field, single.message),
            errors => {
                write!(f, "Validation failed with {} errors: ", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for HelpkitError {
    fn from(err: ValidationError) -> Self {
        HelpkitError::InvalidInput(err.to_string())
    }
}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the field (`address.city`, `lines.0.label`)
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), code: None, metadata: HashMap::new() }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Path and short-circuit state of a [`Validator`]
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub path: Vec<String>,
    pub stop_on_first: bool,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_on_first_error(mut self) -> Self {
        self.stop_on_first = true;
        self
    }

    pub fn push_path(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub fn pop_path(&mut self) {
        self.path.pop();
    }

    pub fn current_path(&self) -> String {
        self.path.join(".")
    }
}

/// Collects field errors across a payload
///
/// ```
/// use helpkit_common::validation::{SirenValidator, StringValidator, Validator};
///
/// let mut validator = Validator::new();
/// validator.validate_field("name", &"ACME".to_string(), &StringValidator::new().not_empty());
/// validator.validate_nested("company", |v| {
///     v.validate_field("siren", &"123456789".to_string(), &SirenValidator::new());
/// });
///
/// let errors = validator.finalize().unwrap_err();
/// assert_eq!(errors.errors[0].field, "company.siren");
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
    context: ValidationContext,
    stopped: bool,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: ValidationContext) -> Self {
        Self { errors: ValidationError::new(), context, stopped: false }
    }

    fn should_short_circuit(&self) -> bool {
        self.context.stop_on_first && self.stopped
    }

    fn qualify(&self, field: String) -> String {
        if self.context.path.is_empty() {
            field
        } else if field.is_empty() {
            self.context.current_path()
        } else {
            format!("{}.{}", self.context.current_path(), field)
        }
    }

    /// Record an error for `field`, prefixed with the current nesting path
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        if self.should_short_circuit() {
            return;
        }
        let field = self.qualify(field.into());
        self.errors.add_field_error(field, message);
        self.stopped = true;
    }

    /// Run `validator` against `value`, recording its message on failure
    pub fn validate_field<T, V>(&mut self, field: &str, value: &T, validator: &V) -> &mut Self
    where
        T: ?Sized,
        V: FieldValidator<T> + ?Sized,
    {
        if !self.should_short_circuit() {
            if let Err(msg) = validator.validate(value) {
                self.add_error(field, msg);
            }
        }
        self
    }

    pub fn validate_range<T>(&mut self, field: &str, value: T, min: T, max: T) -> &mut Self
    where
        T: PartialOrd + fmt::Display,
    {
        if value < min || value > max {
            self.add_error(field, format!("must be between {} and {}", min, max));
        }
        self
    }

    pub fn validate_not_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add_error(field, "cannot be empty");
        }
        self
    }

    pub fn validate_collection_size<T>(
        &mut self,
        field: &str,
        collection: &[T],
        min: Option<usize>,
        max: Option<usize>,
    ) -> &mut Self {
        let size = collection.len();
        if let Some(min) = min.filter(|&min| size < min) {
            self.add_error(field, format!("must contain at least {} items", min));
        }
        if let Some(max) = max.filter(|&max| size > max) {
            self.add_error(field, format!("must not contain more than {} items", max));
        }
        self
    }

    /// Validate a sub-object; errors recorded inside `f` are prefixed with
    /// `field`
    pub fn validate_nested<F>(&mut self, field: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Validator),
    {
        if !self.should_short_circuit() {
            self.context.push_path(field);
            f(self);
            self.context.pop_path();
        }
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.error_count()
    }

    pub fn errors(&self) -> &ValidationError {
        &self.errors
    }

    pub fn finalize(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    pub fn clear(&mut self) {
        self.errors = ValidationError::new();
        self.stopped = false;
    }
}
