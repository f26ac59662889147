//! One-shot `rigctl` transport
//!
//! Each operation runs `rigctl -m <model> -r <port> -s <baud> <command>`
//! and parses what it prints.

use tracing::{debug, warn};

use crate::command::RigCommand;
use crate::config::RigConfig;
use crate::error::RigError;
use crate::gateway::RadioGateway;
use crate::launcher::{launch, Launch, OutputMode};
use crate::reply::{parse_frequency, parse_mode};

/// Radio gateway that spawns a `rigctl` client per call
#[derive(Debug, Clone)]
pub struct Rigctl {
    config: RigConfig,
}

impl Rigctl {
    /// Create a gateway for the given radio
    pub fn new(config: RigConfig) -> Self {
        Self { config }
    }

    /// The radio configuration in use
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Run one command and return its standard output
    async fn run(&self, cmd: &RigCommand) -> Result<String, RigError> {
        let mut args = self.config.device_args();
        args.extend(cmd.args());

        let program = &self.config.rigctl_program;
        let timeout = self.config.response_timeout();

        match launch(program, &args, timeout, OutputMode::Capture).await? {
            Launch::Exited(output) => {
                if !output.status.success() {
                    return Err(RigError::Exit {
                        program: program.clone(),
                        status: output.status.code().unwrap_or(-1),
                        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    });
                }
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Launch::StillRunning(mut child) => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill stalled {}: {}", program, e);
                }
                Err(RigError::Timeout {
                    command: cmd.args().join(" "),
                    timeout_ms: self.config.response_timeout_ms,
                })
            }
        }
    }
}

impl RadioGateway for Rigctl {
    async fn read_frequency(&mut self) -> Result<f64, RigError> {
        let reply = self.run(&RigCommand::GetFrequency).await?;
        Ok(parse_frequency(&reply)?)
    }

    async fn read_mode(&mut self) -> Result<(String, String), RigError> {
        let reply = self.run(&RigCommand::GetMode).await?;
        Ok(parse_mode(&reply)?)
    }

    async fn write_frequency(&mut self, hz: f64) -> Result<(), RigError> {
        debug!("Tuning radio to {:.0} Hz", hz);
        self.run(&RigCommand::SetFrequency { hz }).await?;
        Ok(())
    }
}
