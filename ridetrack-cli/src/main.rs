//! RideTrack CLI - follow a ride's rider and driver from the terminal.
//!
//! This binary is a thin front end over the `ridetrack` library: it resolves
//! configuration, sets up logging and drives the live tracker.

mod commands;
mod error;
mod render;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::live::LiveArgs;
use commands::report::{ReportArgs, RoleArg};
use error::CliError;
use runner::{CliRunner, GlobalOptions};

#[derive(Parser)]
#[command(name = "ridetrack")]
#[command(about = "Live rider/driver tracking for ride bookings", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.config/ridetrack/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and RIDETRACK_API_BASE_URL
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a ride's live locations until Ctrl+C
    Live {
        /// Ride PIN (digits only)
        #[arg(long, conflicts_with = "link")]
        pin: Option<String>,

        /// Share link carrying the PIN as `?pin=`
        #[arg(long)]
        link: Option<String>,

        /// Exit after the first completed poll
        #[arg(long)]
        once: bool,

        /// Print the map state as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Report a rider or driver location
    #[command(allow_negative_numbers = true)]
    Report {
        /// Ride PIN (4-6 digits)
        #[arg(long)]
        pin: String,

        /// Who is reporting
        #[arg(long, value_enum)]
        role: RoleArg,

        /// Latitude in degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long)]
        lng: f64,
    },

    /// Print the haversine distance in miles between two points
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = GlobalOptions {
        config: cli.config,
        api_base: cli.api_base,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Live {
            pin,
            link,
            once,
            json,
        } => {
            let runner = CliRunner::new(&options)?;
            commands::live::run(
                &runner,
                LiveArgs {
                    pin,
                    link,
                    once,
                    json,
                },
            )
        }
        Commands::Report {
            pin,
            role,
            lat,
            lng,
        } => {
            let runner = CliRunner::new(&options)?;
            commands::report::run(
                &runner,
                ReportArgs {
                    pin,
                    role,
                    lat,
                    lng,
                },
            )
        }
        Commands::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => commands::distance::run(lat1, lng1, lat2, lng2),
        Commands::Config { command } => commands::config::run(command, &options.config_path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_coordinates_parse() {
        let cli = Cli::try_parse_from([
            "ridetrack", "distance", "32.7767", "-96.7970", "32.80", "-96.75",
        ])
        .unwrap();
        match cli.command {
            Commands::Distance { lng1, lng2, .. } => {
                assert_eq!(lng1, -96.7970);
                assert_eq!(lng2, -96.75);
            }
            _ => panic!("expected distance"),
        }
    }

    #[test]
    fn test_pin_and_link_conflict() {
        let result = Cli::try_parse_from([
            "ridetrack",
            "live",
            "--pin",
            "0042",
            "--link",
            "https://ride.example/track?pin=0042",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ridetrack",
            "live",
            "--pin",
            "0042",
            "--api-base",
            "http://localhost:8000",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:8000"));
        assert!(cli.verbose);
    }
}
