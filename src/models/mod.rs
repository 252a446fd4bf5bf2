//! Normalized records produced by the site adapters

use serde::{Deserialize, Serialize};

mod project;

pub use project::{
    ChecklistItem, NewChecklistItem, NewProject, NewProjectMaterial, NewSavedPattern, Project,
    ProjectDetail, ProjectMaterial, SavedPattern,
};

/// Title used when a page yields no usable title or product record.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// A fabric or notion listing from one of the material stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricResult {
    pub source: String,
    pub title: String,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub url: String,
}

/// One hit from a pattern catalog search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSearchResult {
    pub source: String,
    pub title: String,
    pub pattern_number: Option<String>,
    pub brand: Option<String>,
    pub difficulty: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub url: String,
}

/// Full pattern page, including the material lists used for shopping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDetail {
    pub source: String,
    pub title: String,
    pub pattern_number: Option<String>,
    pub brand: Option<String>,
    pub difficulty: Option<String>,
    pub sizes: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub fabric_recommendations: Vec<String>,
    #[serde(default)]
    pub notions: Vec<String>,
    pub image_url: Option<String>,
    pub url: String,
}

impl PatternDetail {
    /// Bare record carrying only identity fields; everything optional is absent.
    pub fn minimal(source: &str, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.to_string(),
            title: title.into(),
            pattern_number: None,
            brand: None,
            difficulty: None,
            sizes: None,
            price: None,
            fabric_recommendations: Vec::new(),
            notions: Vec::new(),
            image_url: None,
            url: url.into(),
        }
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    /// Fabric recommendations followed by notions, in page order.
    pub fn materials(&self) -> Vec<String> {
        self.fabric_recommendations
            .iter()
            .chain(&self.notions)
            .cloned()
            .collect()
    }
}

/// A candidate place to buy one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLink {
    /// The material string this link answers.
    pub material: String,
    pub store: String,
    pub url: String,
    pub snippet: Option<String>,
}

/// Response body of the "materials for this pattern" lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMaterials {
    pub pattern: PatternDetail,
    pub purchase_links: Vec<PurchaseLink>,
}

/// A brick-and-mortar fabric or sewing shop from OpenStreetMap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStore {
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
}
