//! Control program commands
//!
//! The same three commands are used in both transports: as trailing
//! arguments to a one-shot `rigctl` process, or as a newline-terminated
//! line written to a running `rigctld`.

/// Command understood by rigctl and rigctld
#[derive(Debug, Clone, PartialEq)]
pub enum RigCommand {
    /// Query the VFO frequency (`f`)
    GetFrequency,
    /// Query the mode and passband (`m`)
    GetMode,
    /// Set the VFO frequency in Hz (`F <hz>`)
    SetFrequency { hz: f64 },
}

impl RigCommand {
    /// Arguments appended to the rigctl command line
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::GetFrequency => vec!["f".to_string()],
            Self::GetMode => vec!["m".to_string()],
            Self::SetFrequency { hz } => vec!["F".to_string(), format_hz(*hz)],
        }
    }

    /// Line written to the rigctld socket
    pub fn line(&self) -> String {
        let mut line = self.args().join(" ");
        line.push('\n');
        line
    }

    /// Number of value lines the daemon answers with
    ///
    /// Set commands answer with a single `RPRT` status line instead.
    pub fn reply_lines(&self) -> usize {
        match self {
            Self::GetFrequency => 1,
            Self::GetMode => 2,
            Self::SetFrequency { .. } => 1,
        }
    }
}

/// Format a frequency for the control program (whole Hz)
fn format_hz(hz: f64) -> String {
    format!("{:.0}", hz)
}
