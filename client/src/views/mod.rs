//! Terminal views consuming the poller state
//!
//! Three screens matching the mobile layout: the readings dashboard, a map
//! placeholder and a settings placeholder. No business logic lives here;
//! the dashboard matches [`shared::LoadState`] exhaustively.

mod map;
mod settings;
mod stats;

pub use map::render as render_map;
pub use settings::render as render_settings;
pub use stats::render as render_stats;

use std::str::FromStr;

/// Screen selection, taken from the first CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Stats,
    Map,
    Settings,
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stats" => Ok(Screen::Stats),
            "map" => Ok(Screen::Map),
            "settings" => Ok(Screen::Settings),
            other => Err(format!(
                "unknown screen: {other} (expected stats, map or settings)"
            )),
        }
    }
}
