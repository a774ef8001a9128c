// Routing endpoints
pub const ORS_DIRECTIONS_URL: &str = "https://api.openrouteservice.org/v2/directions";
pub const OSRM_DEFAULT_URL: &str = "https://router.project-osrm.org";
pub const ORS_API_KEY_ENV: &str = "ORS_API_KEY";
pub const DEFAULT_PROFILE: &str = "driving-car";
pub const ORS_SHARE_FACTOR: f64 = 0.6;
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// Traffic light dataset
pub const DEFAULT_DATASET_PATH: &str = "./data/raleigh_traffic_lights.geojson";

// Signal timing (seconds)
pub const RED_COUNTDOWN_RANGE: (u32, u32) = (20, 40);
pub const GREEN_COUNTDOWN_RANGE: (u32, u32) = (15, 30);
pub const GLOBAL_TOGGLE_PERIOD_SECS: u64 = 30;
pub const PER_LIGHT_TICK_PERIOD_SECS: u64 = 1;

// ETA heuristics
pub const METERS_PER_MILE: f64 = 1609.34;
pub const HIGHWAY_SPEED_MPH: f64 = 70.0;
pub const STREET_SPEED_MPH: f64 = 35.0;
pub const HIGHWAY_MARKERS: [&str; 3] = ["i-", "hwy", "interstate"];
pub const RED_LIGHT_PENALTY_SECS: f64 = 30.0;
pub const DEFAULT_THRESHOLD_METERS: f64 = 25.0;
pub const MAX_ROUTE_CANDIDATES: usize = 2;

// Display placeholders
pub const ETA_PLACEHOLDER: &str = "--";
