// openrouteservice.rs
//
// OpenRouteService directions (GeoJSON flavor). Step names and distances are
// kept as route segments so the estimator can classify each road; the
// summary duration is only used when a route comes back without steps.

use crate::error::RoutingRequestError;
use crate::global_variables::{ORS_API_KEY_ENV, ORS_DIRECTIONS_URL, ORS_SHARE_FACTOR};
use crate::routing::route::{LatLng, RouteCandidate, RouteRequest, RouteSegment};
use crate::routing::service::{http_client, read_body, RoutingService};
use geojson::{Feature, GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Serialize)]
struct DirectionsBody {
    coordinates: [[f64; 2]; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    alternative_routes: Option<AlternativeRoutes>,
}

#[derive(Debug, Serialize)]
struct AlternativeRoutes {
    share_factor: f64,
    target_count: u8,
}

/// The ORS-specific part of a route feature's `properties`.
#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    segments: Vec<Segment>,
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    distance: f64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Summary {
    duration: Option<f64>,
}

/// Converts GeoJSON positions into path points.
pub(crate) fn path_from_coordinates(
    coordinates: &[Vec<f64>],
) -> Result<Vec<LatLng>, RoutingRequestError> {
    coordinates
        .iter()
        .map(|c| match c.as_slice() {
            [lng, lat, ..] => Ok(LatLng::new(*lat, *lng)),
            _ => Err(RoutingRequestError::Malformed(format!(
                "coordinate with {} values",
                c.len()
            ))),
        })
        .collect()
}

/// Path of a `LineString` route geometry.
pub(crate) fn path_from_geometry(
    geometry: Option<Geometry>,
) -> Result<Vec<LatLng>, RoutingRequestError> {
    match geometry.map(|g| g.value) {
        Some(Value::LineString(positions)) => path_from_coordinates(&positions),
        Some(_) => Err(RoutingRequestError::Malformed(
            "route geometry is not a LineString".into(),
        )),
        None => Err(RoutingRequestError::Malformed("route without geometry".into())),
    }
}

fn candidate_from_feature(feature: Feature) -> Result<RouteCandidate, RoutingRequestError> {
    let path = path_from_geometry(feature.geometry)?;
    let properties: Properties = match feature.properties {
        Some(map) => serde_json::from_value(JsonValue::Object(map))?,
        None => Properties::default(),
    };
    let segments: Vec<RouteSegment> = properties
        .segments
        .into_iter()
        .flat_map(|segment| segment.steps)
        .map(|step| RouteSegment {
            distance_meters: step.distance,
            road_name: step.name,
        })
        .collect();
    if segments.is_empty() {
        Ok(RouteCandidate {
            path,
            segments,
            base_duration_seconds: properties.summary.and_then(|s| s.duration),
        })
    } else {
        Ok(RouteCandidate::with_segments(path, segments))
    }
}

/// Parses an OpenRouteService GeoJSON directions response.
pub fn parse_directions(raw: &str) -> Result<Vec<RouteCandidate>, RoutingRequestError> {
    match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(candidate_from_feature)
            .collect(),
        GeoJson::Feature(feature) => Ok(vec![candidate_from_feature(feature)?]),
        GeoJson::Geometry(_) => Err(RoutingRequestError::Malformed(
            "expected route features, got a bare geometry".into(),
        )),
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouteServiceClient {
    http: reqwest::Client,
    api_key: Option<String>,
    profile: String,
    base_url: String,
}

impl OpenRouteServiceClient {
    pub fn new(api_key: Option<String>, profile: String) -> Self {
        Self {
            http: http_client(),
            api_key,
            profile,
            base_url: ORS_DIRECTIONS_URL.to_string(),
        }
    }

    /// Points the client at a different host, e.g. a self-hosted instance.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `target_count` is the total number of routes, main route included.
    fn body(request: &RouteRequest) -> DirectionsBody {
        let alternative_routes = (request.alternatives >= 2).then(|| AlternativeRoutes {
            share_factor: ORS_SHARE_FACTOR,
            target_count: request.alternatives,
        });
        DirectionsBody {
            coordinates: [
                [request.start.lng, request.start.lat],
                [request.end.lng, request.end.lat],
            ],
            alternative_routes,
        }
    }
}

impl RoutingService for OpenRouteServiceClient {
    async fn route(
        &self,
        request: RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingRequestError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RoutingRequestError::MissingApiKey(ORS_API_KEY_ENV))?;
        let url = format!("{}/{}/geojson", self.base_url, self.profile);
        let response = self
            .http
            .post(&url)
            .header("Authorization", api_key)
            .json(&Self::body(&request))
            .send()
            .await?;
        let body = read_body(response).await?;
        parse_directions(&body)
    }
}
