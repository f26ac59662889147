//! Radio connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default hamlib model number (Kenwood TS-590SG)
pub const DEFAULT_MODEL: u32 = 2037;

/// Default rigctld TCP port
pub const DEFAULT_DAEMON_PORT: u16 = 4532;

/// How the radio is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RigTransport {
    /// Run a one-shot `rigctl` process per operation
    #[default]
    Process,
    /// Keep a TCP connection to `rigctld`
    Daemon,
}

/// Immutable radio connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Hamlib model number
    pub model: u32,
    /// Serial device the radio is attached to
    pub serial_port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Client program name or path
    pub rigctl_program: String,
    /// Daemon program name or path
    pub rigctld_program: String,
    /// Daemon listen address for the TCP transport
    pub daemon_address: String,
    /// Transport used by the sync loop
    pub transport: RigTransport,
    /// Bound on each control program response (ms)
    pub response_timeout_ms: u64,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL,
            serial_port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115200,
            rigctl_program: "rigctl".to_string(),
            rigctld_program: "rigctld".to_string(),
            daemon_address: format!("127.0.0.1:{}", DEFAULT_DAEMON_PORT),
            transport: RigTransport::Process,
            response_timeout_ms: 1000,
        }
    }
}

impl RigConfig {
    /// Response timeout as a duration
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Positional arguments identifying the radio
    ///
    /// Shared by the client and the daemon command lines.
    pub fn device_args(&self) -> Vec<String> {
        vec![
            "-m".to_string(),
            self.model.to_string(),
            "-r".to_string(),
            self.serial_port.clone(),
            "-s".to_string(),
            self.baud_rate.to_string(),
        ]
    }

    /// Daemon command line: the radio plus where to listen
    ///
    /// The listen host and port come from `daemon_address`, so the TCP
    /// transport connects where the daemon was started.
    pub fn daemon_args(&self) -> Vec<String> {
        let mut args = self.device_args();
        if let Some((host, port)) = self.daemon_address.rsplit_once(':') {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            args.extend([
                "-T".to_string(),
                host.to_string(),
                "-t".to_string(),
                port.to_string(),
            ]);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_args() {
        let config = RigConfig {
            serial_port: "/dev/cu.usbserial-0567003F3120".into(),
            ..Default::default()
        };

        assert_eq!(
            config.device_args(),
            vec![
                "-m",
                "2037",
                "-r",
                "/dev/cu.usbserial-0567003F3120",
                "-s",
                "115200"
            ]
        );
    }

    #[test]
    fn test_daemon_args_listen_where_the_client_connects() {
        let config = RigConfig {
            daemon_address: "127.0.0.1:4533".into(),
            ..Default::default()
        };

        let args = config.daemon_args();
        assert_eq!(&args[..6], &config.device_args()[..]);
        assert_eq!(&args[6..], &["-T", "127.0.0.1", "-t", "4533"]);

        let v6 = RigConfig {
            daemon_address: "[::1]:4532".into(),
            ..Default::default()
        };
        assert_eq!(&v6.daemon_args()[6..], &["-T", "::1", "-t", "4532"]);
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            RigConfig::default().response_timeout(),
            Duration::from_secs(1)
        );
    }
}
