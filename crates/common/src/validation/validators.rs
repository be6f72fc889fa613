// Field validators shared by forms and API payloads
use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use regex::Regex;

type BoxedFieldValidator<T> = Box<dyn FieldValidator<T> + Send + Sync>;

type CustomValidationFn<T> = Box<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// A single check on a field value; the error is a user-facing message
pub trait FieldValidator<T: ?Sized> {
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Implements `FieldValidator<String>` by delegating to the `str` impl
macro_rules! delegate_string_validator {
    ($($validator:ty),+ $(,)?) => {
        $(
            impl FieldValidator<String> for $validator {
                fn validate(&self, value: &String) -> Result<(), String> {
                    FieldValidator::<str>::validate(self, value.as_str())
                }
            }
        )+
    };
}
pub(crate) use delegate_string_validator;

/// Inclusive bounds for ordered values
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Default for RangeValidator<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> RangeValidator<T> {
    pub fn empty() -> Self {
        Self { min: None, max: None }
    }

    pub fn new(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        if let Some(min) = self.min.as_ref().filter(|min| value < *min) {
            return Err(format!("Value must be at least {}", min));
        }
        if let Some(max) = self.max.as_ref().filter(|max| value > *max) {
            return Err(format!("Value must not exceed {}", max));
        }
        Ok(())
    }
}

/// Length and pattern constraints on text, counted in characters
#[derive(Debug, Clone)]
pub struct StringValidator {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    not_empty: bool,
    trim: bool,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    pub fn new() -> Self {
        Self { min_length: None, max_length: None, pattern: None, not_empty: false, trim: true }
    }

    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Whether surrounding whitespace is ignored (default: yes)
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = if self.trim { value.trim() } else { value };
        let length = val.chars().count();

        if self.not_empty && val.is_empty() {
            return Err("Value cannot be empty".to_string());
        }
        if let Some(min) = self.min_length.filter(|&min| length < min) {
            return Err(format!("Length must be at least {} characters", min));
        }
        if let Some(max) = self.max_length.filter(|&max| length > max) {
            return Err(format!("Length must not exceed {} characters", max));
        }
        if let Some(pattern) = self.pattern.as_ref().filter(|p| !p.is_match(val)) {
            return Err(format!("Value must match pattern: {}", pattern.as_str()));
        }
        Ok(())
    }
}

/// Size, uniqueness and per-item checks for lists
pub struct CollectionValidator<T> {
    min_size: Option<usize>,
    max_size: Option<usize>,
    unique_items: bool,
    item_validator: Option<BoxedFieldValidator<T>>,
}

impl<T> fmt::Debug for CollectionValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionValidator")
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("unique_items", &self.unique_items)
            .field("item_validator", &self.item_validator.as_ref().map(|_| "<dyn FieldValidator>"))
            .finish()
    }
}

impl<T: PartialEq> Default for CollectionValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> CollectionValidator<T> {
    pub fn new() -> Self {
        Self { min_size: None, max_size: None, unique_items: false, item_validator: None }
    }

    pub fn min_size(mut self, min: usize) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn max_size(mut self, max: usize) -> Self {
        self.max_size = Some(max);
        self
    }

    pub fn unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    /// Check every item; the first failure is reported with its index
    ///
    /// ```
    /// use helpkit_common::validation::{CollectionValidator, FieldValidator, SirenValidator};
    ///
    /// let validator = CollectionValidator::<String>::new().item_validator(SirenValidator::new());
    /// let err = validator.validate(&vec!["732829320".to_string(), "123".to_string()]).unwrap_err();
    /// assert!(err.starts_with("Item at index 1"));
    /// ```
    pub fn item_validator<V>(mut self, validator: V) -> Self
    where
        V: FieldValidator<T> + Send + Sync + 'static,
    {
        self.item_validator = Some(Box::new(validator));
        self
    }
}

impl<T: PartialEq> FieldValidator<[T]> for CollectionValidator<T> {
    fn validate(&self, value: &[T]) -> Result<(), String> {
        let size = value.len();

        if let Some(min) = self.min_size.filter(|&min| size < min) {
            return Err(format!("Collection must contain at least {} items", min));
        }
        if let Some(max) = self.max_size.filter(|&max| size > max) {
            return Err(format!("Collection must not exceed {} items", max));
        }
        if self.unique_items
            && value.iter().enumerate().any(|(i, item)| value[..i].contains(item))
        {
            return Err("Collection must contain unique items".to_string());
        }
        if let Some(validator) = &self.item_validator {
            for (index, item) in value.iter().enumerate() {
                validator
                    .validate(item)
                    .map_err(|e| format!("Item at index {} failed validation: {}", index, e))?;
            }
        }
        Ok(())
    }
}

impl<T: PartialEq> FieldValidator<Vec<T>> for CollectionValidator<T> {
    fn validate(&self, value: &Vec<T>) -> Result<(), String> {
        FieldValidator::<[T]>::validate(self, value.as_slice())
    }
}

/// Validator backed by a closure
pub struct CustomValidator<T: ?Sized> {
    validator: CustomValidationFn<T>,
}

impl<T: ?Sized> fmt::Debug for CustomValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator").field("validator", &"<closure>").finish()
    }
}

impl<T: ?Sized> CustomValidator<T> {
    pub fn new<F>(validator: F) -> Self
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        Self { validator: Box::new(validator) }
    }
}

impl<T: ?Sized> FieldValidator<T> for CustomValidator<T> {
    fn validate(&self, value: &T) -> Result<(), String> {
        (self.validator)(value)
    }
}

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl EmailValidator {
    pub fn new() -> Self {
        Self
    }
}

impl FieldValidator<str> for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if EMAIL_REGEX.as_ref().is_some_and(|re| re.is_match(value.trim())) {
            Ok(())
        } else {
            Err("Invalid email format".to_string())
        }
    }
}

/// Absolute URL with an allowed scheme (http and https by default)
#[derive(Debug, Clone)]
pub struct UrlValidator {
    require_https: bool,
    allowed_schemes: Vec<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    pub fn new() -> Self {
        Self { require_https: false, allowed_schemes: vec!["http".into(), "https".into()] }
    }

    pub fn require_https(mut self) -> Self {
        self.require_https = true;
        self
    }

    pub fn allowed_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }
}

impl FieldValidator<str> for UrlValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let parsed = url::Url::parse(value).map_err(|_| "Invalid URL format".to_string())?;
        let scheme = parsed.scheme();

        if self.require_https && scheme != "https" {
            return Err("URL must use HTTPS".to_string());
        }
        if !self.allowed_schemes.iter().any(|allowed| allowed == scheme) {
            return Err(format!("URL scheme '{}' is not allowed", scheme));
        }
        Ok(())
    }
}

delegate_string_validator!(StringValidator, EmailValidator, UrlValidator);
