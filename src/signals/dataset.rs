//! Static traffic light dataset (GeoJSON `FeatureCollection` of points).

use crate::error::DataLoadError;
use crate::global_variables::HTTP_TIMEOUT_SECS;
use crate::routing::route::LatLng;
use crate::routing::service::http_client_with_timeout;
use geojson::{GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the dataset lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Anything that looks like an http(s) URL is fetched, everything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DatasetSource::Url(location.to_string())
        } else {
            DatasetSource::File(PathBuf::from(location))
        }
    }
}

/// Reads the raw dataset text.
pub async fn fetch(source: &DatasetSource) -> Result<String, DataLoadError> {
    fetch_with_timeout(source, Duration::from_secs(HTTP_TIMEOUT_SECS)).await
}

/// Like `fetch`, but a URL that has not answered within `timeout` fails.
pub async fn fetch_with_timeout(
    source: &DatasetSource,
    timeout: Duration,
) -> Result<String, DataLoadError> {
    match source {
        DatasetSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| DataLoadError::Io {
                    path: path.display().to_string(),
                    source,
                })
        }
        DatasetSource::Url(url) => {
            let response = http_client_with_timeout(timeout).get(url).send().await?;
            if !response.status().is_success() {
                return Err(DataLoadError::Status(response.status().as_u16()));
            }
            Ok(response.text().await?)
        }
    }
}

fn point_of(index: usize, geometry: Option<Geometry>) -> Result<LatLng, DataLoadError> {
    match geometry.map(|g| g.value) {
        Some(Value::Point(position)) if position.len() >= 2 => {
            Ok(LatLng::from_lng_lat([position[0], position[1]]))
        }
        _ => Err(DataLoadError::UnsupportedGeometry { index }),
    }
}

/// Extracts the point positions, in dataset order.
///
/// A lone `Feature` or `Point` geometry is read as a one-signal dataset.
pub fn parse_points(raw: &str) -> Result<Vec<LatLng>, DataLoadError> {
    match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| point_of(index, feature.geometry))
            .collect(),
        GeoJson::Feature(feature) => Ok(vec![point_of(0, feature.geometry)?]),
        GeoJson::Geometry(geometry) => Ok(vec![point_of(0, Some(geometry))?]),
    }
}
