//! Command-line interface for websdrcat.
//!
//! Every flag overrides the matching field of the loaded settings.

use std::path::PathBuf;

use cat_rigctl::RigTransport;
use cat_sync::ModeDedupe;
use clap::{Parser, ValueEnum};

use crate::settings::Settings;

/// websdrcat - Keep a CAT radio and a WebSDR page on the same frequency
#[derive(Parser, Debug)]
#[command(name = "websdrcat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: ~/.config/websdrcat/settings.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Serial device the radio is attached to
    #[arg(short = 'r', long, value_name = "DEVICE")]
    pub serial_port: Option<String>,

    /// Serial baud rate
    #[arg(short = 's', long, value_name = "BAUD")]
    pub baud: Option<u32>,

    /// Hamlib rig model number
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<u32>,

    /// How the radio is reached
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Do not start rigctld
    #[arg(long)]
    pub no_daemon: bool,

    /// WebSDR page to load
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// WebDriver server URL
    #[arg(long, value_name = "URL")]
    pub webdriver: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Waterfall height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub waterfall_height: Option<u32>,

    /// Waterfall scroll speed
    #[arg(long, value_name = "SPEED")]
    pub waterfall_speed: Option<u32>,

    /// Pause between radio polls
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// When a radio mode change is pushed to the page
    #[arg(long, value_enum)]
    pub mode_dedupe: Option<DedupeArg>,

    /// Save the effective settings before starting
    #[arg(long)]
    pub write_config: bool,

    /// Log every command sent to either side
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    /// One rigctl process per operation
    Process,
    /// TCP connection to rigctld
    Daemon,
}

impl From<TransportArg> for RigTransport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Process => RigTransport::Process,
            TransportArg::Daemon => RigTransport::Daemon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupeArg {
    /// Whenever the radio's mode name changes
    Raw,
    /// Only when the page mode changes
    Translated,
}

impl From<DedupeArg> for ModeDedupe {
    fn from(arg: DedupeArg) -> Self {
        match arg {
            DedupeArg::Raw => ModeDedupe::RawRadioMode,
            DedupeArg::Translated => ModeDedupe::TranslatedMode,
        }
    }
}

impl Cli {
    /// Apply the flags given on the command line
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(port) = &self.serial_port {
            settings.radio.serial_port = port.clone();
        }
        if let Some(baud) = self.baud {
            settings.radio.baud_rate = baud;
        }
        if let Some(model) = self.model {
            settings.radio.model = model;
        }
        if let Some(transport) = self.transport {
            settings.radio.transport = transport.into();
        }
        if self.no_daemon {
            settings.start_daemon = false;
        }
        if let Some(url) = &self.url {
            settings.websdr.url = url.clone();
        }
        if let Some(webdriver) = &self.webdriver {
            settings.browser.server_url = webdriver.clone();
        }
        if self.headless {
            settings.browser.headless = true;
        }
        if let Some(height) = self.waterfall_height {
            settings.websdr.waterfall_height = height;
        }
        if let Some(speed) = self.waterfall_speed {
            settings.websdr.waterfall_speed = speed;
        }
        if let Some(poll_ms) = self.poll_ms {
            settings.sync.poll_interval_ms = poll_ms;
        }
        if let Some(dedupe) = self.mode_dedupe {
            settings.sync.mode_dedupe = dedupe.into();
        }
    }
}
