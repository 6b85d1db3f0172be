//! Live command - follow a ride until interrupted.

use ridetrack::pin::SessionPin;
use ridetrack::projection::ProjectionConfig;
use ridetrack::tracker::{LiveTracker, TrackingView};
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::render::render_view;
use crate::runner::CliRunner;

/// Arguments for the live command.
pub struct LiveArgs {
    pub pin: Option<String>,
    pub link: Option<String>,
    pub once: bool,
    pub json: bool,
}

/// Run the live command.
pub fn run(runner: &CliRunner, args: LiveArgs) -> Result<(), CliError> {
    runner.log_startup("live");

    let LiveArgs {
        pin,
        link,
        once,
        json,
    } = args;
    let pin = match link.as_deref() {
        Some(link) => Some(SessionPin::from_share_link(link)?.as_str().to_string()),
        None => pin,
    };

    let client = runner.client()?;
    let tracker_config = runner.config().to_tracker_config();
    let runtime = runner.runtime()?;

    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Runtime(format!("Failed to install Ctrl+C handler: {}", e)))?;

    runtime.block_on(async move {
        let mut tracker = LiveTracker::new(client, tracker_config);
        let projection = tracker.config().projection.clone();
        let mut updates = tracker.subscribe();

        tracker.set_pin(pin.as_deref())?;

        let result = loop {
            let view = updates.borrow_and_update().clone();
            if let Err(e) = print_view(&view, &projection, json) {
                break Err(e);
            }
            if once && view.cycles_completed() > 0 {
                break Ok(());
            }

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break Ok(()),

                changed = updates.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                }
            }
        };

        tracker.shutdown().await;
        result
    })
}

fn print_view(
    view: &TrackingView,
    projection: &ProjectionConfig,
    json: bool,
) -> Result<(), CliError> {
    if json {
        if view.is_loading() {
            return Ok(());
        }
        let map = view.map_view(projection);
        let line = serde_json::to_string(&map).map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", line);
    } else {
        println!("{}", render_view(view, projection));
        println!();
    }
    Ok(())
}
