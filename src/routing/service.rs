use crate::config::RoutingConfig;
use crate::error::RoutingRequestError;
use crate::global_variables::HTTP_TIMEOUT_SECS;
use crate::routing::openrouteservice::OpenRouteServiceClient;
use crate::routing::osrm::OsrmClient;
use crate::routing::route::{RouteCandidate, RouteRequest};
use std::future::Future;
use std::time::Duration;

/// Anything that can turn a start/end pair into route candidates.
pub trait RoutingService {
    fn route(
        &self,
        request: RouteRequest,
    ) -> impl Future<Output = Result<Vec<RouteCandidate>, RoutingRequestError>> + Send;
}

/// The routing provider chosen at startup.
#[derive(Debug, Clone)]
pub enum Router {
    OpenRouteService(OpenRouteServiceClient),
    Osrm(OsrmClient),
}

impl Router {
    pub fn from_config(config: &RoutingConfig) -> Self {
        match config {
            RoutingConfig::OpenRouteService {
                api_key_env,
                profile,
            } => {
                let api_key = std::env::var(api_key_env).ok();
                if api_key.is_none() {
                    log::warn!("{} is not set; routing requests will fail", api_key_env);
                }
                Router::OpenRouteService(OpenRouteServiceClient::new(api_key, profile.clone()))
            }
            RoutingConfig::Osrm { base_url, profile } => {
                Router::Osrm(OsrmClient::new(base_url.clone(), profile.clone()))
            }
        }
    }
}

impl RoutingService for Router {
    async fn route(
        &self,
        request: RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingRequestError> {
        match self {
            Router::OpenRouteService(client) => client.route(request).await,
            Router::Osrm(client) => client.route(request).await,
        }
    }
}

/// HTTP client whose requests give up after `timeout`.
pub(crate) fn http_client_with_timeout(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            log::warn!("Cannot build HTTP client with a timeout, using defaults: {}", e);
            reqwest::Client::new()
        }
    }
}

pub(crate) fn http_client() -> reqwest::Client {
    http_client_with_timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
}

/// Reads a response body, turning non-success statuses into errors.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, RoutingRequestError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RoutingRequestError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
