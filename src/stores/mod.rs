//! Brick-and-mortar fabric shops near a point, from OpenStreetMap's Overpass API

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::client::HttpClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::NearbyStore;

pub const DEFAULT_RADIUS_M: u32 = 10_000;

const UNNAMED: &str = "Unnamed store";
const NO_ADDRESS: &str = "Address not available";
const ADDRESS_TAGS: [&str; 4] = ["addr:housenumber", "addr:street", "addr:city", "addr:postcode"];

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Clone)]
pub struct NearbyStores {
    client: HttpClient,
    endpoint: String,
    timeout: Duration,
}

impl NearbyStores {
    pub fn new(client: HttpClient, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            HttpClient::from_config(config)?,
            &config.overpass_url,
            Duration::from_secs(config.overpass_timeout_secs),
        ))
    }

    /// Fabric, sewing and craft shops within `radius_m` metres.
    pub async fn search(&self, lat: f64, lon: f64, radius_m: u32) -> Result<Vec<NearbyStore>> {
        info!("Looking up stores within {}m of ({}, {})", radius_m, lat, lon);

        let query = overpass_query(lat, lon, radius_m);
        let response: OverpassResponse = self
            .client
            .post_form_json(&self.endpoint, &[("data", query.as_str())], self.timeout)
            .await?;

        let stores: Vec<NearbyStore> = response.elements.into_iter().map(to_store).collect();
        info!("Found {} nearby stores", stores.len());
        Ok(stores)
    }
}

fn overpass_query(lat: f64, lon: f64, radius_m: u32) -> String {
    let around = format!("(around:{radius_m},{lat},{lon})");
    format!(
        r#"[out:json][timeout:25];
(
  node["shop"="fabric"]{around};
  node["shop"="sewing"]{around};
  node["craft"="sewing"]{around};
  node["shop"="craft"]{around};
);
out body;"#
    )
}

fn to_store(mut element: OverpassElement) -> NearbyStore {
    let address = build_address(&element.tags);
    let mut tag = |key: &str| element.tags.remove(key);

    NearbyStore {
        name: tag("name").unwrap_or_else(|| UNNAMED.to_string()),
        phone: tag("phone"),
        website: tag("website"),
        opening_hours: tag("opening_hours"),
        address,
        lat: element.lat,
        lon: element.lon,
    }
}

/// Non-empty address parts joined with ", ".
fn build_address(tags: &HashMap<String, String>) -> String {
    let parts: Vec<&str> = ADDRESS_TAGS
        .iter()
        .filter_map(|key| tags.get(*key))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if parts.is_empty() {
        NO_ADDRESS.to_string()
    } else {
        parts.join(", ")
    }
}
