use serde_json::Value;
use tracing::{debug, instrument};

use crate::{error::ForecastError, model::Coordinates, session::HttpSession};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

const FORECAST_FIELD: &str = "properties.forecast";

/// Client for the api.weather.gov two-step forecast lookup.
///
/// The session is borrowed, never owned: the caller creates it, shares it,
/// and closes it. Nothing here is mutated after construction, so one client
/// can serve concurrent lookups as long as the session allows it.
pub struct WeatherClient<'a, S: ?Sized> {
    session: &'a S,
    base_url: String,
}

impl<S: ?Sized> std::fmt::Debug for WeatherClient<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<'a, S: HttpSession + ?Sized> WeatherClient<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self::with_base_url(session, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mirror or a mock server.
    pub fn with_base_url(session: &'a S, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { session, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the grid point lookup for the given coordinates.
    pub fn points_url(&self, lat: f64, lon: f64) -> String {
        format!("{}/points/{}", self.base_url, Coordinates::new(lat, lon))
    }

    /// Resolve the grid point for `lat`/`lon`, then fetch its forecast.
    ///
    /// Returns the forecast document exactly as the API sent it. The first
    /// failure (transport, non-2xx status, bad JSON, missing
    /// `properties.forecast`) aborts the lookup; the forecast endpoint is only
    /// hit once the points lookup fully succeeded.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_forecast(&self, lat: f64, lon: f64) -> Result<Value, ForecastError> {
        let points_url = self.points_url(lat, lon);
        debug!(url = %points_url, "Resolving grid point");

        let forecast_url = {
            let response = self.session.get(&points_url).await?.error_for_status(&points_url)?;
            let points = response.json(&points_url)?;

            forecast_url(&points)
                .ok_or_else(|| ForecastError::MissingField {
                    url: points_url.clone(),
                    field: FORECAST_FIELD,
                })?
                .to_owned()
        };

        debug!(url = %forecast_url, "Fetching forecast");

        let response = self.session.get(&forecast_url).await?.error_for_status(&forecast_url)?;
        response.json(&forecast_url)
    }
}

fn forecast_url(points: &Value) -> Option<&str> {
    points.pointer("/properties/forecast")?.as_str()
}
