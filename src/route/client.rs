//! Routing service client
//!
//! Resolves the two selected POIs into request parameters, fetches the trip
//! payload and hands it back opaque. Endpoints with a service id are passed
//! by id so the service can route door-to-door; anything else goes as a raw
//! coordinate-and-floor triple.

use crate::config::RoutingConfig;
use crate::geo::{poi_lat_lng, LatLng};
use crate::search::Poi;
use crate::{Result, WayfinderError};
use serde_json::Value;
use tracing::{debug, info};

/// An opaque trip payload together with the resolved endpoints.
#[derive(Debug, Clone)]
pub struct FetchedRoute {
    /// Trip response exactly as served; normalize via `route::extract`
    pub trip: Value,

    /// Normalized start position
    pub start_coords: LatLng,

    /// Normalized end position
    pub end_coords: LatLng,

    /// Start floor index
    pub start_z: i32,

    /// End floor index
    pub end_z: i32,
}

/// HTTP client for the campus routing service.
pub struct RoutingClient {
    client: reqwest::Client,
    config: RoutingConfig,
}

impl RoutingClient {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch a pedestrian route between two selected POIs.
    pub async fn fetch_route(&self, start: &Poi, end: &Poi) -> Result<FetchedRoute> {
        let start_coords = poi_lat_lng(start);
        let end_coords = poi_lat_lng(end);
        let (Some(start_coords), Some(end_coords)) = (start_coords, end_coords) else {
            return Err(WayfinderError::RoutingError(
                "Could not get coordinates for selected locations.".to_string(),
            ));
        };

        let start_z = start.z;
        let end_z = end.z;

        let mut params: Vec<(&str, String)> = vec![
            ("campusCollectionId", self.config.campus_id.to_string()),
            ("mode", "PEDESTRIAN".to_string()),
            ("lang", "en".to_string()),
        ];
        match start.poi_id {
            Some(id) => params.push(("fromPoiId", id.to_string())),
            None => params.push((
                "fromLngLatZ",
                format!("{},{},{}", start_coords.lng, start_coords.lat, start_z),
            )),
        }
        match end.poi_id {
            Some(id) => params.push(("toPoiId", id.to_string())),
            None => params.push((
                "toLngLatZ",
                format!("{},{},{}", end_coords.lng, end_coords.lat, end_z),
            )),
        }

        let url = format!("{}/routing/v2/a-to-b/", self.config.base_url);
        debug!("requesting route: {} -> {}", start.title, end.title);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WayfinderError::RoutingError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WayfinderError::RoutingError(format!(
                "Routing API returned {}",
                response.status().as_u16()
            )));
        }

        let trip: Value = response
            .json()
            .await
            .map_err(|e| WayfinderError::RoutingError(e.to_string()))?;

        info!("route fetched: {} -> {}", start.title, end.title);

        Ok(FetchedRoute {
            trip,
            start_coords,
            end_coords,
            start_z,
            end_z,
        })
    }
}

/// Build the embedded map viewer URL for two resolved endpoints.
pub fn build_map_embed_url(
    config: &RoutingConfig,
    start: LatLng,
    end: LatLng,
    start_z: i32,
    end_z: i32,
) -> String {
    format!(
        "{}/?campusid={}&starttype=point&start={},{},{}&desttype=point&dest={},{},{}",
        config.embed_base_url,
        config.campus_id,
        start.lng,
        start.lat,
        start_z,
        end.lng,
        end.lat,
        end_z
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PoiPoint;

    #[test]
    fn test_embed_url() {
        let config = RoutingConfig {
            embed_base_url: "https://use.example.com".into(),
            campus_id: 742,
            ..RoutingConfig::default()
        };
        let url = build_map_embed_url(
            &config,
            LatLng {
                lat: 58.4,
                lng: 15.57,
            },
            LatLng {
                lat: 58.41,
                lng: 15.58,
            },
            0,
            2,
        );
        assert_eq!(
            url,
            "https://use.example.com/?campusid=742&starttype=point&start=15.57,58.4,0&desttype=point&dest=15.58,58.41,2"
        );
    }

    #[tokio::test]
    async fn test_fetch_route_requires_coordinates() {
        let client = RoutingClient::new(RoutingConfig::default());
        let start = Poi {
            title: "No point".into(),
            ..Poi::default()
        };
        let end = Poi {
            title: "Somewhere".into(),
            point: Some(PoiPoint {
                coordinates: vec![15.5, 58.4],
            }),
            ..Poi::default()
        };
        let err = client.fetch_route(&start, &end).await.unwrap_err();
        assert!(matches!(err, WayfinderError::RoutingError(_)));
        assert!(err.to_string().contains("coordinates"));
    }
}
