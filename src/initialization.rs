use std::time::Duration;
use log::info;
use crate::config::{load_api_key, Config};
use crate::errors::MeteoInitError;
use crate::favorite::FavoriteStore;
use crate::manager_aemet::Aemet;
use crate::population::PopulationIndex;
use crate::projector::DirIconCatalog;
use crate::session::Session;

/// Managers and state the command handlers work with
pub struct Mgr {
    pub session: Session<Aemet>,
    pub icons: DirIconCatalog,
}

/// Loads the population index and favorite location and sets up the AEMET client.
///
/// # Arguments
///
/// * 'config' - the loaded configuration
/// * 'fetch_favorite' - whether to fetch the favorite location's forecast right away
pub fn init(config: &Config, fetch_favorite: bool) -> Result<Mgr, MeteoInitError> {
    info!("meteocloud version: {}", env!("CARGO_PKG_VERSION"));

    let population = PopulationIndex::load(&config.files.population_file)?;
    let favorites = FavoriteStore::new(&config.files.favorite_file, config.general.default_location.clone());

    let aemet = Aemet::new(
        &config.aemet.base_url,
        load_api_key(&config.aemet),
        Duration::from_secs(config.aemet.timeout_secs),
    );

    let session = if fetch_favorite {
        Session::start(population, favorites, aemet)
    } else {
        Session::new(population, favorites, aemet)
    };
    info!("favorite location is {}", session.selected());

    Ok(Mgr { session, icons: DirIconCatalog::new(&config.files.icon_dir) })
}
