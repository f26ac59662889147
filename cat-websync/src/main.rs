//! WebSDR CAT Sync
//!
//! Keeps a hamlib-controlled transceiver and a WebSDR page in a browser
//! tuned to the same frequency and mode. Tune either one and the other
//! follows.

mod cli;
mod settings;

use std::process::ExitCode;

use anyhow::{Context, Result};
use cat_rigctl::{ensure_daemon, RadioGateway, RigTransport, Rigctl, RigctldClient};
use cat_sync::{SyncCommand, SyncConfig, SyncLoop};
use cat_websdr::{RemoteGateway, WebDriverSession, WebSdr};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use settings::Settings;

const DEFAULT_FILTER: &str = "websdrcat=info,cat_rigctl=info,cat_websdr=info,cat_sync=info";
const VERBOSE_FILTER: &str = "websdrcat=debug,cat_rigctl=debug,cat_websdr=debug,cat_sync=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);

    if cli.write_config {
        let path = settings.save(cli.config.as_deref())?;
        info!("Settings saved to {}", path.display());
    }

    info!(
        "Starting WebSDR CAT sync: model {} on {} at {} baud",
        settings.radio.model, settings.radio.serial_port, settings.radio.baud_rate
    );

    if settings.start_daemon {
        ensure_daemon(&settings.radio)
            .await
            .context("radio: could not start the rig control daemon")?;
    }

    let mut session = WebDriverSession::start(&settings.browser)
        .await
        .context("WebSDR: could not open a browser session")?;
    session
        .navigate(&settings.websdr.url)
        .await
        .context("WebSDR: could not load the page")?;

    // The page scripts are not callable until it has finished loading
    tokio::time::sleep(settings.websdr.settle()).await;

    let mut remote = WebSdr::new(session);
    remote
        .apply_display_settings(
            settings.websdr.waterfall_height,
            settings.websdr.waterfall_speed,
        )
        .await
        .context("WebSDR: could not apply waterfall settings")?;

    let cmd_rx = shutdown_on_ctrl_c();

    match settings.radio.transport {
        RigTransport::Process => {
            let radio = Rigctl::new(settings.radio.clone());
            sync_until_stopped(settings.sync, radio, remote, cmd_rx).await
        }
        RigTransport::Daemon => {
            let radio = RigctldClient::connect(
                &settings.radio.daemon_address,
                settings.radio.response_timeout(),
            )
            .await
            .with_context(|| format!("radio: could not reach {}", settings.radio.daemon_address))?;
            sync_until_stopped(settings.sync, radio, remote, cmd_rx).await
        }
    }
}

/// Command channel that receives a shutdown on Ctrl-C
fn shutdown_on_ctrl_c() -> mpsc::Receiver<SyncCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted, shutting down");
                let _ = cmd_tx.send(SyncCommand::Shutdown).await;
            }
            Err(e) => {
                warn!("Cannot listen for Ctrl-C: {}", e);
                // Keep the sender alive so the loop is not stopped
                std::future::pending::<()>().await;
            }
        }
    });

    cmd_rx
}

async fn sync_until_stopped<R: RadioGateway>(
    config: SyncConfig,
    radio: R,
    remote: WebSdr<WebDriverSession>,
    cmd_rx: mpsc::Receiver<SyncCommand>,
) -> Result<()> {
    let mut sync = SyncLoop::with_config(config, radio, remote);
    let result = sync.run(cmd_rx).await;
    let cycles = sync.cycles();
    let (_radio, remote) = sync.into_parts();

    match result {
        Ok(()) => {
            remote.into_inner().close().await;
            info!("Stopped after {} cycles", cycles);
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("sync loop stopped")),
    }
}
