/// WeatherAPI.com current-conditions client.
///
/// Supplies the rainfall and wind readings for a site's coordinates. Tide
/// level and water flow come from the gauge network, not from here —
/// `readings_from` merges the two sources into the assembler's input set.
///
/// API documentation: https://www.weatherapi.com/docs/
/// Endpoint: https://api.weatherapi.com/v1/current.json

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::logging;
use crate::model::{Factor, Reading};
use crate::sites::RiverSite;

const WEATHER_API_URL: &str = "https://api.weatherapi.com/v1/current.json";

// ============================================================================
// WeatherAPI Response Structures
// ============================================================================

/// Top-level current-conditions response.
#[derive(Debug, Deserialize)]
pub struct WeatherApiResponse {
    pub current: WeatherApiCurrent,
}

/// The `current` block. Only the fields the engine consumes are kept;
/// serde drops the rest of the payload.
#[derive(Debug, Deserialize)]
pub struct WeatherApiCurrent {
    pub precip_mm: f64,
    pub wind_kph: f64,
    pub temp_c: Option<f64>,
    pub humidity: Option<f64>,
    #[serde(rename = "last_updated_epoch")]
    pub observed_epoch: Option<i64>,
}

/// Processed weather observation for one site query.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub precip_mm: f64,
    pub wind_kph: f64,
    pub temp_c: Option<f64>,
    pub humidity: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetches current conditions for a coordinate pair.
///
/// # Parameters
/// - `client`: HTTP client (build once, reuse across sites)
/// - `api_key`: WeatherAPI key, usually from `api_key_from_env`
/// - `latitude`/`longitude`: the site's WGS84 coordinates
pub fn fetch_current(
    client: &reqwest::blocking::Client,
    api_key: &str,
    latitude: f64,
    longitude: f64,
) -> Result<WeatherObservation, Box<dyn std::error::Error>> {
    let url = format!(
        "{}?key={}&q={},{}&aqi=no",
        WEATHER_API_URL, api_key, latitude, longitude
    );

    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(format!("WeatherAPI error: {}", response.status()).into());
    }

    let api_response: WeatherApiResponse = response.json()?;
    Ok(parse_observation(api_response.current))
}

/// Fetches current conditions for a registered site, logging the outcome to
/// the operational trail. This is the polling loop's entry point.
pub fn fetch_for_site(
    client: &reqwest::blocking::Client,
    api_key: &str,
    site: &RiverSite,
) -> Result<WeatherObservation, Box<dyn std::error::Error>> {
    match fetch_current(client, api_key, site.latitude, site.longitude) {
        Ok(observation) => {
            logging::debug(
                logging::LogSource::Weather,
                Some(site.id),
                &format!(
                    "current conditions: {} mm rain, {} kph wind",
                    observation.precip_mm, observation.wind_kph
                ),
            );
            Ok(observation)
        }
        Err(e) => {
            logging::log_weather_failure(site.id, "current-conditions fetch", e.as_ref());
            Err(e)
        }
    }
}

/// Reads the WeatherAPI key from the environment (`.env` supported).
pub fn api_key_from_env() -> Option<String> {
    dotenv::dotenv().ok();
    std::env::var("WEATHER_API_KEY").ok().filter(|k| !k.is_empty())
}

fn parse_observation(current: WeatherApiCurrent) -> WeatherObservation {
    WeatherObservation {
        precip_mm: current.precip_mm,
        wind_kph: current.wind_kph,
        temp_c: current.temp_c,
        humidity: current.humidity,
        observed_at: current
            .observed_epoch
            .and_then(|epoch| DateTime::from_timestamp(epoch, 0)),
    }
}

// ============================================================================
// Reading Assembly
// ============================================================================

/// Combines a weather observation with gauge-supplied tide and flow values
/// into the full reading set the assembler requires, in canonical factor
/// order.
pub fn readings_from(
    weather: &WeatherObservation,
    tide_level_m: f64,
    water_flow_m3s: f64,
) -> Vec<Reading> {
    vec![
        Reading::new(Factor::Rainfall, weather.precip_mm),
        Reading::new(Factor::WindSpeed, weather.wind_kph),
        Reading::new(Factor::TideLevel, tide_level_m),
        Reading::new(Factor::WaterFlow, water_flow_m3s),
    ]
}

// ============================================================================
// Tests
// ============================================================================
