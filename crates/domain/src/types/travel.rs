//! Travel options for distance lookups

use serde::{Deserialize, Serialize};

use crate::impl_domain_keyword_conversions;

/// Means of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl_domain_keyword_conversions!(TravelMode {
    Driving => "driving",
    Walking => "walking",
    Bicycling => "bicycling",
    Transit => "transit",
});

/// Unit system for the human-readable texts returned with distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl_domain_keyword_conversions!(UnitSystem {
    Metric => "metric",
    Imperial => "imperial",
});
