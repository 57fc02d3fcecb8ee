use std::process::ExitCode;
use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{error, info};
use crate::config::load_config;
use crate::initialization::{init, Mgr};
use crate::logging::setup_logger;
use crate::models::location::LocationCode;
use crate::render::{ForecastView, SearchView};

mod config;
mod errors;
mod favorite;
mod initialization;
mod logging;
mod manager_aemet;
mod models;
mod population;
mod projector;
mod render;
mod session;

/// Municipal weather forecasts from AEMET OpenData
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "METEOCLOUD_CONFIG", default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the forecast for a municipality, or for the favorite one
    Forecast {
        code: Option<LocationCode>,
    },
    /// Search municipalities by the start of any word of their name
    Search {
        query: String,
        /// Show the forecast for the given result (1-based)
        #[arg(long)]
        select: Option<usize>,
        /// Save the selected result as favorite
        #[arg(long, requires = "select")]
        favorite: bool,
    },
    /// Show the favorite municipality, or set it
    Favorite {
        code: Option<LocationCode>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let _handle = setup_logger(&config.general)?;

    let command = cli.command.unwrap_or(Command::Forecast { code: None });
    let fetch_favorite = matches!(command, Command::Forecast { code: None });
    let mut mgr = init(&config, fetch_favorite)?;

    match command {
        Command::Forecast { code } => {
            if let Some(code) = code {
                mgr.session.select_code(code)?;
            }
            print_forecast(&mgr);
        }

        Command::Search { query, select, favorite } => {
            let results = mgr.session.filter(&query);
            println!("{}", SearchView(results));

            if let Some(n) = select {
                if n == 0 {
                    bail!("results are numbered from 1");
                }
                mgr.session.select(n - 1)?;
                print_forecast(&mgr);

                if favorite {
                    mgr.session.mark_favorite()?;
                    println!("Favorite set to {}", mgr.session.selected_name().unwrap_or(mgr.session.selected().as_str()));
                }
            }
        }

        Command::Favorite { code } => {
            if let Some(code) = code {
                mgr.session.choose(code)?;
                mgr.session.mark_favorite()?;
            }
            let favorite = mgr.session.favorite();
            println!("{} [{}]", mgr.session.name(&favorite).unwrap_or("?"), favorite);
        }
    }

    Ok(())
}

/// Prints the forecast of the selected location, or why there is none
fn print_forecast(mgr: &Mgr) {
    let now = Local::now().naive_local();
    if let Some(record) = mgr.session.forecast() {
        info!("showing forecast for {} issued {}", record.name, record.issued.as_deref().unwrap_or("-"));
    }

    match mgr.session.projection(&mgr.icons, now) {
        Some(forecast) => print!("{}", ForecastView { code: mgr.session.selected(), forecast: &forecast }),
        None => {
            let name = mgr.session.selected_name().unwrap_or(mgr.session.selected().as_str());
            println!("No forecast for {}: {}", name, mgr.session.message().unwrap_or("no data"));
        }
    }
}
