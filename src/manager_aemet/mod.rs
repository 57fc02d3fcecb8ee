pub mod errors;

use std::time::Duration;
use log::{debug, info};
use ureq::Agent;
use crate::models::aemet_forecast::{Envelope, ForecastRecord, MunicipalityForecast};
use crate::models::location::LocationCode;
pub use errors::AemetError;

/// Struct for fetching municipal daily forecasts from AEMET OpenData
pub struct Aemet {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl Aemet {
    /// Returns an Aemet struct ready for fetching forecasts
    ///
    /// # Arguments
    ///
    /// * 'base_url' - the daily municipal forecast endpoint, the location code is appended to it
    /// * 'api_key' - AEMET OpenData API key
    /// * 'timeout' - global timeout for each request
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Aemet {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        let agent = config.into();

        Self { agent, base_url: base_url.trim_end_matches('/').to_string(), api_key }
    }

    /// Retrieves the daily forecast for a municipality.
    ///
    /// AEMET answers the first request with an envelope holding a status and, when the
    /// status is 200, an url to the actual data document. The data document is an array
    /// where the first element carries the prediction.
    ///
    /// # Arguments
    ///
    /// * 'code' - municipality code
    pub fn get_forecast(&self, code: &LocationCode) -> Result<ForecastRecord, AemetError> {
        let url = format!("{}/{}", self.base_url, code);

        let mut response = self.agent
            .get(url.as_str())
            .header("Accept", "application/json")
            .header("api_key", self.api_key.as_str())
            .call()?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_vec()?;

        let data_url = data_url(status, &decode_body(&body))?;
        debug!("forecast data for {} at {}", code, data_url);

        let mut response = self.agent
            .get(data_url.as_str())
            .header("Accept", "application/json")
            .call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AemetError::api(status.as_u16() as i64));
        }
        let body = response.body_mut().read_to_vec()?;

        let forecast = forecast_document(&decode_body(&body))?;
        info!("forecast retrieved for {} ({}), {} days", code, forecast.name, forecast.days.len());

        Ok(forecast)
    }
}

/// Extracts the data url from the envelope, or classifies the error status.
/// Falls back on the http status if the body isn't an envelope at all.
///
/// # Arguments
///
/// * 'http_status' - status code of the http response
/// * 'json' - response body
fn data_url(http_status: u16, json: &str) -> Result<String, AemetError> {
    let envelope: Envelope = match serde_json::from_str(json) {
        Ok(e) => e,
        Err(e) if http_status == 200 => return Err(AemetError::from(e)),
        Err(_) => return Err(AemetError::api(http_status as i64)),
    };

    if envelope.estado != 200 {
        return Err(AemetError::api(envelope.estado));
    }

    envelope.datos
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AemetError::Document(format!("no data url in response: {}", envelope.descripcion)))
}

/// Parses the data document and returns the prediction of its first element
///
/// # Arguments
///
/// * 'json' - the data document
fn forecast_document(json: &str) -> Result<ForecastRecord, AemetError> {
    let document: Vec<MunicipalityForecast> = serde_json::from_str(json)?;

    document
        .into_iter()
        .next()
        .map(ForecastRecord::from)
        .ok_or(AemetError::Document("empty forecast document".to_string()))
}

/// The data documents are served as ISO-8859-15, anything not valid UTF-8 is read as Latin-1
fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
