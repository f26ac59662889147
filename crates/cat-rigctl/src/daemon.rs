//! rigctld pre-flight and launch
//!
//! Only one process may own the radio's serial port, so the daemon is
//! treated as a singleton: look for a running instance first and only
//! start one when none is found.

use serialport::available_ports;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use tracing::{info, warn};

use crate::config::RigConfig;
use crate::error::RigError;
use crate::launcher::{launch, Launch, OutputMode};

/// Outcome of [`ensure_daemon`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    /// A daemon was already running and was left alone
    AlreadyRunning,
    /// A new daemon was started in the background
    Started,
}

/// Returns true if any running process name contains `name`
pub fn is_process_running(name: &str) -> bool {
    let mut system = System::new_with_specifics(
        RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
    );
    system.refresh_processes(ProcessesToUpdate::All, true);

    let running = process_names(&system).any(|process| process.contains(name));
    running
}

fn process_names(system: &System) -> impl Iterator<Item = String> + '_ {
    system
        .processes()
        .values()
        .map(|p| p.name().to_string_lossy().into_owned())
}

/// Returns true if the serial device shows up in the port enumeration
///
/// Enumeration failures count as "unknown" and return true so that the
/// daemon, not this check, reports the real problem.
pub fn serial_port_present(port: &str) -> bool {
    match available_ports() {
        Ok(ports) => ports.iter().any(|p| p.port_name == port),
        Err(e) => {
            warn!("Could not enumerate serial ports: {}", e);
            true
        }
    }
}

/// Name the daemon shows up as in the process table
fn daemon_process_name(config: &RigConfig) -> &str {
    std::path::Path::new(&config.rigctld_program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&config.rigctld_program)
}

/// Make sure a rigctld instance is running
///
/// A freshly started daemon is expected to outlive the bounded wait: if it
/// is still running when the wait expires it is considered started. A daemon
/// that exits within the wait failed to open the radio.
pub async fn ensure_daemon(config: &RigConfig) -> Result<DaemonStatus, RigError> {
    let name = daemon_process_name(config);

    if is_process_running(name) {
        info!("The daemon {} was already running", name);
        return Ok(DaemonStatus::AlreadyRunning);
    }

    if !serial_port_present(&config.serial_port) {
        warn!(
            "Serial port {} not found among available ports",
            config.serial_port
        );
    }

    info!("Starting the daemon {}...", name);
    let launched = launch(
        &config.rigctld_program,
        &config.daemon_args(),
        config.response_timeout(),
        OutputMode::Discard,
    )
    .await?;

    match launched {
        Launch::StillRunning(_child) => {
            info!("{} running in the background", name);
            Ok(DaemonStatus::Started)
        }
        Launch::Exited(output) => Err(RigError::Spawn {
            program: config.rigctld_program.clone(),
            reason: format!("exited early with {}", output.status),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_process_name_strips_path() {
        let config = RigConfig {
            rigctld_program: "/usr/local/bin/rigctld".into(),
            ..Default::default()
        };
        assert_eq!(daemon_process_name(&config), "rigctld");
        assert_eq!(daemon_process_name(&RigConfig::default()), "rigctld");
    }

    #[test]
    fn test_unknown_process_not_running() {
        assert!(!is_process_running("no-such-daemon-0567003F3120"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_daemon_exiting_early_is_spawn_error() {
        let config = RigConfig {
            rigctld_program: "false".into(),
            serial_port: "/dev/null".into(),
            ..Default::default()
        };

        let result = ensure_daemon(&config).await;
        assert!(matches!(result, Err(RigError::Spawn { .. })));
    }
}
