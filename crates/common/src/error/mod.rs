//! Error plumbing shared by the helper modules
//!
//! Each helper reports failures through its own small enum (`ColorError`,
//! `PhoneError`, ...). All of them describe rejected input and convert into
//! [`HelpkitError::InvalidInput`], so callers holding a workspace `Result`
//! can use `?` directly. The path guard in [`crate::files`] is the only
//! helper that raises [`CommonError`], which maps to
//! [`HelpkitError::Security`].

use helpkit_domain::HelpkitError;
use thiserror::Error;

use crate::color::ColorError;
use crate::contact::phone::PhoneError;
use crate::contact::vcard::VcardError;
use crate::date::DateError;
use crate::password::PasswordError;
use crate::vat::VatError;

/// Result type of the path helpers
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures not tied to a single helper's input format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// A relative path tried to leave its root directory
    #[error("Path '{path}' escapes its root directory")]
    PathTraversal { path: String },
}

impl CommonError {
    /// Create a path traversal error
    pub fn path_traversal<P: Into<String>>(path: P) -> Self {
        Self::PathTraversal { path: path.into() }
    }
}

impl From<CommonError> for HelpkitError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::PathTraversal { .. } => Self::Security(err.to_string()),
        }
    }
}

/// `From<$error> for HelpkitError` as `InvalidInput`, keeping the message
macro_rules! impl_invalid_input {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for HelpkitError {
                fn from(err: $error) -> Self {
                    Self::InvalidInput(err.to_string())
                }
            }
        )+
    };
}

impl_invalid_input!(ColorError, DateError, PasswordError, PhoneError, VatError, VcardError);
