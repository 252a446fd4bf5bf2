//! Nearby-store and direct materials handlers

use serde::{Deserialize, Serialize};

use super::ApiResult;
use crate::error::Error;
use crate::models::{NearbyStore, PurchaseLink};
use crate::pattern_finder::PatternFinder;
use crate::stores::{DEFAULT_RADIUS_M, NearbyStores};

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius_m: u32,
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS_M
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialsRequest {
    pub materials: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoresResponse {
    pub stores: Vec<NearbyStore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialsResponse {
    pub results: Vec<PurchaseLink>,
}

/// `POST /stores/nearby`
pub async fn nearby_stores(stores: &NearbyStores, req: &LocationRequest) -> ApiResult<StoresResponse> {
    if !(-90.0..=90.0).contains(&req.lat) || !(-180.0..=180.0).contains(&req.lon) {
        return Err(Error::invalid(format!("invalid coordinates ({}, {})", req.lat, req.lon)).into());
    }
    if req.radius_m == 0 {
        return Err(Error::invalid("radius_m must be positive").into());
    }

    Ok(StoresResponse {
        stores: stores.search(req.lat, req.lon, req.radius_m).await?,
    })
}

/// `POST /stores/materials`
pub async fn find_materials(
    finder: &PatternFinder,
    req: &MaterialsRequest,
) -> ApiResult<MaterialsResponse> {
    let materials: Vec<String> = req
        .materials
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    Ok(MaterialsResponse {
        results: finder.find_materials(&materials).await?,
    })
}
