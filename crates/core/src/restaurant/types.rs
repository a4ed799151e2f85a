//! Restaurant domain types.

use serde::{Deserialize, Serialize};

/// Cuisine used when a line does not carry one.
pub const DEFAULT_CUISINE: &str = "Local Flavor";

/// Description used when a line does not carry one.
pub const DEFAULT_DESCRIPTION: &str = "Highly rated restaurant nearby.";

/// A point on the globe, supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and inside their ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            ));
        }
        Ok(())
    }
}

/// A restaurant record produced by the parser or the canned dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Opaque id, unique within one result set.
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_uri: Option<String>,
}

impl Restaurant {
    /// Whether two records describe the same place, ignoring ids.
    pub fn same_place(&self, other: &Restaurant) -> bool {
        self.name == other.name
            && self.cuisine == other.cuisine
            && self.description == other.description
            && self.map_uri == other.map_uri
    }

    /// Render as a triple-field line (`Name || Cuisine || Description`).
    pub fn to_triple_line(&self) -> String {
        format!("{} || {} || {}", self.name, self.cuisine, self.description)
    }
}

/// Where a grounding citation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    Web,
    Maps,
}

/// A grounding citation attached to a generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub kind: CitationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Citation {
    pub fn web(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            kind: CitationKind::Web,
            title: Some(title.into()),
            uri: Some(uri.into()),
        }
    }

    pub fn maps(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            kind: CitationKind::Maps,
            title: Some(title.into()),
            uri: Some(uri.into()),
        }
    }
}
