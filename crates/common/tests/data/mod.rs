//! Sample data shared by the integration tests
//!
//! - [`samples`]: companies with real, checksum-valid identifiers and
//!   nested rows for sorting and path helpers

pub mod samples;
