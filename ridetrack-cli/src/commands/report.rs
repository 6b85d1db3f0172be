//! Report command - post one location ping.

use clap::ValueEnum;
use console::style;
use ridetrack::client::TrackingClient;
use ridetrack::geo::Coordinate;
use ridetrack::location::Role;
use ridetrack::pin::SessionPin;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Role selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum RoleArg {
    Rider,
    Driver,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Rider => Role::Rider,
            RoleArg::Driver => Role::Driver,
        }
    }
}

/// Arguments for the report command.
pub struct ReportArgs {
    pub pin: String,
    pub role: RoleArg,
    pub lat: f64,
    pub lng: f64,
}

/// Run the report command.
pub fn run(runner: &CliRunner, args: ReportArgs) -> Result<(), CliError> {
    runner.log_startup("report");

    let pin = SessionPin::parse(&args.pin)?;
    pin.ensure_reportable()?;
    let at = Coordinate::validated(args.lat, args.lng)?;
    let role = Role::from(args.role);

    let client = runner.client()?;
    runner
        .runtime()?
        .block_on(client.report_location(&pin, role, at))?;

    println!(
        "{} Reported {} location for PIN {}: {}, {}",
        style("✓").green(),
        role,
        pin,
        at.lat,
        at.lng
    );
    Ok(())
}
