//! Domain types and models
//!
//! Plain data holders returned or consumed by the helpers. They carry no
//! invariants beyond optional fields.

pub mod command;
pub mod organization;
pub mod output_file;
pub mod table;
pub mod travel;

pub use command::CommandResult;
pub use organization::Organization;
pub use output_file::{format_bytes, OutputFile};
pub use table::Table;
pub use travel::{TravelMode, UnitSystem};
