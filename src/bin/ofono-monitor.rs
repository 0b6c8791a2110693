//! Follows oFono modems and their network registration and logs every change.

use std::{collections::HashSet, error::Error, path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};
use futures::{Stream, StreamExt};
use ofono_sync::{
    config::{BusKind, Config, ConfigPaths},
    services::{
        DriverTable, Modem,
        ofono::{self, NetworkRegistration, SyncState},
    },
    tracing_config,
};
use tracing::{Level, info, span, warn};

#[derive(Parser)]
#[command(name = "ofono-monitor")]
#[command(about = "Follow oFono modems and their network registration")]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bus to reach oFono on, overriding the configuration
    #[arg(short, long, value_enum)]
    bus: Option<BusArg>,

    /// Also write logs to a daily rolling file in the log directory
    #[arg(long)]
    log_file: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BusArg {
    System,
    Session,
}

impl From<BusArg> for BusKind {
    fn from(bus: BusArg) -> Self {
        match bus {
            BusArg::System => BusKind::System,
            BusArg::Session => BusKind::Session,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(bus) = cli.bus {
        config.ofono.bus = bus.into();
    }

    let _guard = if cli.log_file {
        Some(tracing_config::init_with_file(
            &config.general,
            &ConfigPaths::log_dir()?,
        )?)
    } else {
        tracing_config::init(&config.general)?;
        None
    };

    let _span = span!(Level::INFO, "ofono_monitor").entered();

    let mut drivers = DriverTable::new();
    let driver = ofono::init(&mut drivers, config.ofono.clone())?;
    drivers.probe_all().await?;

    if let Some(manager) = driver.manager() {
        info!("Waiting for modem enumeration on the {} bus", config.ofono.bus);
        let mut snapshots = manager.watch_modems();
        let mut seen = HashSet::new();

        loop {
            tokio::select! {
                Some(modems) = snapshots.next() => follow_new_modems(&modems, &mut seen),
                _ = tokio::signal::ctrl_c() => break,
                else => break,
            }
        }
    } else {
        warn!("oFono driver has no manager after probing");
    }

    info!("Shutting down");
    drivers.remove_all().await;
    ofono::exit(&mut drivers)?;

    Ok(())
}

fn follow_new_modems(modems: &[Arc<Modem>], seen: &mut HashSet<String>) {
    let present: HashSet<String> = modems.iter().map(|modem| modem.path().to_string()).collect();
    for gone in seen.difference(&present) {
        info!("Modem {gone} disappeared");
    }
    seen.retain(|path| present.contains(path));

    for modem in modems {
        if !seen.insert(modem.path().to_string()) {
            continue;
        }

        info!(
            "Modem {} appeared: {} {} (powered={}, online={})",
            modem.path(),
            modem.manufacturer(),
            modem.model(),
            modem.powered(),
            modem.online()
        );

        tokio::spawn(follow_network_registration(
            modem.path().to_string(),
            modem.watch_network_registration(),
        ));
    }
}

/// Log each network registration the modem attaches once its first fetch is done.
///
/// Ends when the modem is dropped.
async fn follow_network_registration(
    path: String,
    attachments: impl Stream<Item = Option<Arc<NetworkRegistration>>>,
) {
    let mut attachments = std::pin::pin!(attachments);

    while let Some(attached) = attachments.next().await {
        let Some(netreg) = attached else {
            info!("{path}: no network registration");
            continue;
        };

        let handler_path = path.clone();
        netreg.register_status_changed_handler(move |status| {
            info!("{handler_path}: registration status {status}");
        });

        let handler_path = path.clone();
        netreg.register_strength_changed_handler(move |strength| {
            info!("{handler_path}: signal strength {strength}%");
        });

        match netreg.wait_synced().await {
            SyncState::Failed(reason) => {
                warn!("{path}: network registration unavailable: {reason}");
            }
            _ => info!(
                "{path}: registration status {}, operator {:?}, strength {}%",
                netreg.status(),
                netreg.operator_name(),
                netreg.strength()
            ),
        }
    }
}
