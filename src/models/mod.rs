pub mod aemet_forecast;
pub mod location;
