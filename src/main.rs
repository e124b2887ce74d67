//! KitchenGuard node — main entry point.
//!
//! Hexagonal architecture: one domain core behind port traits, adapters
//! on the outside.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │   SimBench                MqttChannel      SystemClock   │
//! │   (Sensor+Panel+Display)  (Messaging)      (Clock)       │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            NodeService (pure logic)                │  │
//! │  │  classify · actuate · command · session recovery   │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use kitchenguard::adapters::clock::SystemClock;
use kitchenguard::adapters::mqtt::MqttChannel;
use kitchenguard::adapters::sim::SimBench;
use kitchenguard::app::ports::Credentials;
use kitchenguard::app::service::NodeService;
use kitchenguard::config::NodeConfig;

/// Looked for next to the binary unless a path is given as the first
/// argument or via `KITCHENGUARD_CONFIG`.
const DEFAULT_CONFIG_PATH: &str = "kitchenguard.json";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  KitchenGuard v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 1. Configuration ──────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KITCHENGUARD_CONFIG").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = NodeConfig::load_or_default(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    info!(
        "broker {}:{}, client id '{}'",
        config.broker_host, config.broker_port, config.client_id
    );

    // ── 2. Construct adapters ─────────────────────────────────
    let mut bench = SimBench::new();
    let mut link = MqttChannel::new(&config);
    let mut clock = SystemClock::new();

    // ── 3. Boot the node ──────────────────────────────────────
    let mut node = NodeService::new();
    node.startup(&mut bench, &mut clock);

    let credentials = Credentials {
        username: &config.username,
        password: &config.password,
    };

    info!("entering control loop");

    // ── 4. Control loop ───────────────────────────────────────
    loop {
        node.run_cycle(
            &mut bench,
            &mut link,
            &mut clock,
            &config.client_id,
            &credentials,
        );
    }
}
