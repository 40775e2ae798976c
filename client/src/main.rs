//! Soil Health Monitor - terminal client
//!
//! Polls the field sensor gateway every 30 seconds and renders soil health
//! readings. Press Enter for a manual refresh, Ctrl-C to quit.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soil_monitor_client::config::Config;
use soil_monitor_client::external::SensorClient;
use soil_monitor_client::poller::Poller;
use soil_monitor_client::views::{self, Screen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soil_monitor=info,soil_monitor_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Soil Health Monitor");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Sensor gateway: {}", config.sensor.base_url);

    let screen: Screen = match std::env::args().nth(1) {
        Some(arg) => arg.parse().map_err(anyhow::Error::msg)?,
        None => Screen::default(),
    };

    // The placeholder screens are static; render and leave.
    match screen {
        Screen::Map => {
            print!("{}", views::render_map());
            return Ok(());
        }
        Screen::Settings => {
            print!("{}", views::render_settings());
            return Ok(());
        }
        Screen::Stats => {}
    }

    let client = SensorClient::new(config.sensor.base_url.clone());
    let handle = Poller::new(client)
        .with_period(Duration::from_secs(config.sensor.poll_interval_secs))
        .start();

    let mut state = handle.state();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{}", views::render_stats(&handle.current()));
    println!("(press Enter to refresh, Ctrl-C to quit)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                println!("{}", views::render_stats(&current));
            }
            line = input.next_line(), if stdin_open => {
                match line? {
                    Some(_) => {
                        println!("Refreshing...");
                        handle.refresh().await;
                    }
                    None => stdin_open = false,
                }
            }
        }
    }

    tracing::info!("Shutting down");
    handle.stop().await;

    Ok(())
}
