// osrm.rs
//
// OSRM route service. Only overview geometry and total durations are
// requested, so candidates carry a base duration instead of segments.

use crate::error::RoutingRequestError;
use crate::routing::openrouteservice::path_from_geometry;
use crate::routing::route::{RouteCandidate, RouteRequest};
use crate::routing::service::{http_client, read_body, RoutingService};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    geometry: geojson::Geometry,
    duration: f64,
}

/// Parses an OSRM `/route/v1` response requested with `geometries=geojson`.
pub fn parse_routes(raw: &str) -> Result<Vec<RouteCandidate>, RoutingRequestError> {
    let response: RouteResponse = serde_json::from_str(raw)?;
    if response.code != "Ok" {
        return Err(RoutingRequestError::Malformed(format!(
            "OSRM answered {}: {}",
            response.code,
            response.message.unwrap_or_default()
        )));
    }
    response
        .routes
        .into_iter()
        .map(|route| {
            let path = path_from_geometry(Some(route.geometry))?;
            Ok(RouteCandidate::with_duration(path, route.duration))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    pub fn new(base_url: String, profile: String) -> Self {
        Self {
            http: http_client(),
            base_url,
            profile,
        }
    }

    /// OSRM counts alternatives on top of the main route, so a request for
    /// `n` routes in total asks for `n - 1` alternatives.
    fn url(&self, request: &RouteRequest) -> String {
        let alternatives = match request.alternatives {
            0 | 1 => "false".to_string(),
            n => (n - 1).to_string(),
        };
        format!(
            "{}/route/v1/{}/{},{};{},{}?alternatives={}{}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            request.start.lng,
            request.start.lat,
            request.end.lng,
            request.end.lat,
            alternatives,
            "&geometries=geojson&overview=full&steps=false"
        )
    }
}

impl RoutingService for OsrmClient {
    async fn route(
        &self,
        request: RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingRequestError> {
        let response = self.http.get(self.url(&request)).send().await?;
        let body = read_body(response).await?;
        parse_routes(&body)
    }
}
