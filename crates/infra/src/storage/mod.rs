//! Filesystem helpers and the JSON document store

pub mod files;
pub mod json_db;

pub use json_db::JsonDb;
