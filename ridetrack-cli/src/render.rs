//! Plain-text rendering of the tracking view.

use console::style;
use ridetrack::projection::{MapView, ProjectionConfig};
use ridetrack::tracker::{Notice, TrackerStatus, TrackingView};

/// Render a view as terminal lines.
pub fn render_view(view: &TrackingView, projection: &ProjectionConfig) -> String {
    let mut lines = Vec::new();

    let pin = view
        .pin()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = match view.status() {
        TrackerStatus::Polling => style(view.status().display_status()).green(),
        TrackerStatus::Error => style(view.status().display_status()).red(),
        _ => style(view.status().display_status()).dim(),
    };
    lines.push(format!("{} {} [{}]", style("PIN").bold(), pin, status));

    for notice in view.notices() {
        let text = notice.to_string();
        let styled = match notice {
            Notice::Loading => style(text).dim(),
            Notice::Error(_) => style(text).red(),
            Notice::Distance(_) => style(text).cyan().bold(),
            Notice::NoLocationYet(_) => style(text).yellow(),
        };
        lines.push(format!("  {}", styled));
    }

    lines.extend(render_map(&view.map_view(projection)));
    lines.join("\n")
}

fn render_map(map: &MapView) -> Vec<String> {
    let mut lines = vec![format!(
        "  Map: center {:.4}, {:.4} (zoom {})",
        map.center.lat, map.center.lng, map.zoom
    )];

    for marker in &map.markers {
        lines.push(format!("  ● {}", marker.popup_lines().join(" | ")));
    }

    lines
}
