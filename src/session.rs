use chrono::NaiveDateTime;
use log::{info, warn};
use crate::errors::SessionError;
use crate::favorite::FavoriteStore;
use crate::manager_aemet::{Aemet, AemetError};
use crate::models::aemet_forecast::ForecastRecord;
use crate::models::location::LocationCode;
use crate::population::PopulationIndex;
use crate::projector::{project, IconCatalog, ProjectedForecast};

/// Anything able to deliver a forecast for a location
pub trait ForecastSource {
    fn get_forecast(&self, code: &LocationCode) -> Result<ForecastRecord, AemetError>;
}

impl ForecastSource for Aemet {
    fn get_forecast(&self, code: &LocationCode) -> Result<ForecastRecord, AemetError> {
        Aemet::get_forecast(self, code)
    }
}

/// Holds the state the user works on: the filtered list, the selected location
/// and its forecast. Every user action is one method call.
pub struct Session<S: ForecastSource> {
    population: PopulationIndex,
    favorites: FavoriteStore,
    source: S,
    filtered: Vec<(LocationCode, String)>,
    selected: LocationCode,
    forecast: Option<ForecastRecord>,
    message: Option<String>,
}

impl<S: ForecastSource> Session<S> {
    /// Returns a new session with the favorite location selected, no forecast is fetched yet
    ///
    /// # Arguments
    ///
    /// * 'population' - the population index
    /// * 'favorites' - the favorite location store
    /// * 'source' - where forecasts come from
    pub fn new(population: PopulationIndex, favorites: FavoriteStore, source: S) -> Session<S> {
        let selected = favorites.load();

        Session {
            population,
            favorites,
            source,
            filtered: Vec::new(),
            selected,
            forecast: None,
            message: None,
        }
    }

    /// Returns a new session with the favorite location selected and its forecast fetched
    ///
    /// # Arguments
    ///
    /// * 'population' - the population index
    /// * 'favorites' - the favorite location store
    /// * 'source' - where forecasts come from
    pub fn start(population: PopulationIndex, favorites: FavoriteStore, source: S) -> Session<S> {
        let mut session = Session::new(population, favorites, source);
        session.refresh();
        session
    }

    /// Fetches the forecast for the selected location, replacing the current one.
    /// A failure leaves the session without forecast and with a message for the user.
    pub fn refresh(&mut self) {
        match self.source.get_forecast(&self.selected) {
            Ok(forecast) => {
                self.forecast = Some(forecast);
                self.message = None;
            }
            Err(e) => {
                warn!("no forecast for {}: {}", self.selected, e);
                self.forecast = None;
                self.message = Some(e.user_message());
            }
        }
    }

    /// Filters the population index and keeps the result as the list to select from
    ///
    /// # Arguments
    ///
    /// * 'query' - text typed by the user
    pub fn filter(&mut self, query: &str) -> &[(LocationCode, String)] {
        self.filtered = self.population.filter(query);
        &self.filtered
    }

    /// Selects an entry of the filtered list and fetches its forecast
    ///
    /// # Arguments
    ///
    /// * 'index' - 0-based position in the filtered list
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        let (code, name) = self.filtered
            .get(index)
            .cloned()
            .ok_or(SessionError::OutOfRange { index, len: self.filtered.len() })?;

        info!("selected {} ({})", name, code);
        self.selected = code;
        self.refresh();

        Ok(())
    }

    /// Selects a location by code and fetches its forecast
    ///
    /// # Arguments
    ///
    /// * 'code' - a code present in the population index
    pub fn select_code(&mut self, code: LocationCode) -> Result<(), SessionError> {
        self.choose(code)?;
        self.refresh();

        Ok(())
    }

    /// Selects a location by code without fetching anything, the current forecast is dropped
    ///
    /// # Arguments
    ///
    /// * 'code' - a code present in the population index
    pub fn choose(&mut self, code: LocationCode) -> Result<(), SessionError> {
        if self.population.name(&code).is_none() {
            return Err(SessionError::UnknownLocation(code.to_string()));
        }

        self.selected = code;
        self.forecast = None;
        self.message = None;

        Ok(())
    }

    /// Saves the selected location as favorite
    pub fn mark_favorite(&self) -> Result<(), SessionError> {
        self.favorites.save(&self.selected)?;
        Ok(())
    }

    /// Currently saved favorite location
    pub fn favorite(&self) -> LocationCode {
        self.favorites.load()
    }

    pub fn selected(&self) -> &LocationCode {
        &self.selected
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.population.name(&self.selected)
    }

    pub fn name(&self, code: &LocationCode) -> Option<&str> {
        self.population.name(code)
    }

    pub fn forecast(&self) -> Option<&ForecastRecord> {
        self.forecast.as_ref()
    }

    /// Message for the user about the last forecast request, if it failed
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Display values of the current forecast
    ///
    /// # Arguments
    ///
    /// * 'icons' - available sky state images
    /// * 'now' - current local date and time
    pub fn projection(&self, icons: &impl IconCatalog, now: NaiveDateTime) -> Option<ProjectedForecast> {
        self.forecast.as_ref().map(|f| project(f, icons, now))
    }
}
