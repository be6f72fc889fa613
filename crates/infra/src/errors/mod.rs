//! Error conversions for the impure helpers.

mod conversions;

pub use conversions::InfraError;
pub(crate) use conversions::{io_error, to_helpkit};
