//! HTTP plumbing shared by the service integrations.

mod client;

pub use client::{HttpClient, HttpClientBuilder};
