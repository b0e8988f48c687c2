//! Location search
//!
//! Free-text POI search against the campus map service. The primary
//! `search/equery/` endpoint is tried first; on any failure the older
//! `api/pois/` endpoint is used instead. Result items vary in shape between
//! service revisions, so every field is mapped tolerantly.

pub mod debounce;

use crate::config::SearchConfig;
use crate::{Result, WayfinderError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Geometry attached to a POI, as `[x, y]` in whatever reference system the
/// serving endpoint used. Normalize through `geo::to_lat_lng` before use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoiPoint {
    pub coordinates: Vec<f64>,
}

/// A selectable named location. Immutable once returned by search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Poi {
    /// Display name, HTML-stripped
    pub title: String,

    /// Building the POI belongs to, when known
    pub building_name: Option<String>,

    /// Floor label, when known
    pub floor_name: Option<String>,

    /// Raw position as served; may be projected
    pub point: Option<PoiPoint>,

    /// Vertical/floor index, 0 for ground level
    pub z: i32,

    /// Service identifier, present for proper POIs only
    pub poi_id: Option<i64>,

    /// Result category reported by the service
    pub category: String,
}

impl Poi {
    /// Short human label: title plus building/floor detail when present.
    pub fn detail_label(&self) -> String {
        let mut parts = Vec::new();
        if let Some(building) = &self.building_name {
            parts.push(building.clone());
        }
        if let Some(floor) = &self.floor_name {
            parts.push(format!("Floor {}", floor));
        }
        if parts.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, parts.join(" / "))
        }
    }
}

/// Remove HTML tags from a highlighted search result title.
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Map one raw result item into a `Poi`, defaulting every missing field.
fn map_search_item(item: &Value) -> Poi {
    let title_raw = item
        .get("title")
        .and_then(Value::as_str)
        .or_else(|| item.get("name").and_then(Value::as_str))
        .or_else(|| item.get("buildingName").and_then(Value::as_str))
        .unwrap_or("Unknown");
    let title = strip_html(title_raw);
    let title = if title.is_empty() {
        "Unknown".to_string()
    } else {
        title
    };

    let point = item
        .get("point")
        .and_then(|p| p.get("coordinates"))
        .or_else(|| item.get("geometry").and_then(|g| g.get("coordinates")))
        .and_then(Value::as_array)
        .map(|coords| PoiPoint {
            coordinates: coords.iter().filter_map(Value::as_f64).collect(),
        });

    Poi {
        title,
        building_name: item
            .get("buildingName")
            .and_then(Value::as_str)
            .map(str::to_string),
        floor_name: item
            .get("floorName")
            .and_then(Value::as_str)
            .map(str::to_string),
        point,
        z: item.get("z").and_then(Value::as_i64).unwrap_or(0) as i32,
        poi_id: item.get("poiId").and_then(Value::as_i64),
        category: item
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("poi")
            .to_string(),
    }
}

/// Pull the result array out of a search response body.
fn result_items(body: &Value) -> Vec<Value> {
    body.get("result")
        .or_else(|| body.get("pois"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// HTTP client for the campus search service.
pub struct SearchClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Search for POIs matching a free-text query.
    ///
    /// Queries shorter than two characters return an empty list without
    /// touching the network.
    pub async fn search(&self, query: &str) -> Result<Vec<Poi>> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Ok(Vec::new());
        }

        match self.search_equery(query).await {
            Ok(pois) => Ok(pois),
            Err(e) => {
                warn!("equery search failed, falling back to pois endpoint: {}", e);
                self.search_pois(query).await
            }
        }
    }

    async fn search_equery(&self, query: &str) -> Result<Vec<Poi>> {
        let url = format!("{}/search/equery/", self.config.base_url);
        let body: Value = self
            .client
            .get(&url)
            .query(&[
                ("campusid", self.config.campus_id.to_string().as_str()),
                ("q", query),
                ("lang", self.config.lang.as_str()),
                ("rows", self.config.rows.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(|e| WayfinderError::SearchError(e.to_string()))?
            .json()
            .await
            .map_err(|e| WayfinderError::SearchError(e.to_string()))?;

        let pois: Vec<Poi> = result_items(&body).iter().map(map_search_item).collect();
        debug!("equery returned {} results for '{}'", pois.len(), query);
        Ok(pois)
    }

    async fn search_pois(&self, query: &str) -> Result<Vec<Poi>> {
        let url = format!("{}/api/pois/", self.config.base_url);
        let body: Value = self
            .client
            .get(&url)
            .query(&[
                ("campusid", self.config.campus_id.to_string().as_str()),
                ("query", query),
                ("lang", self.config.lang.as_str()),
                ("rows", self.config.rows.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(|e| WayfinderError::SearchError(e.to_string()))?
            .json()
            .await
            .map_err(|e| WayfinderError::SearchError(e.to_string()))?;

        let pois: Vec<Poi> = result_items(&body).iter().map(map_search_item).collect();
        debug!("pois endpoint returned {} results for '{}'", pois.len(), query);
        Ok(pois)
    }
}
