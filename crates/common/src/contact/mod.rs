//! Contact details: phone numbers and vCards

pub mod phone;
pub mod vcard;

pub use phone::{format_phone, PhoneError, PhoneFormat, PhoneNumber};
pub use vcard::{Address, VCard, VcardError};
