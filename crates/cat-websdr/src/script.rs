//! WebSDR page entry points
//!
//! The WebSDR page exposes plain JavaScript functions. Each [`SdrScript`]
//! renders to one call (or, for display settings, a short sequence).
//! Parsing is the inverse, used by the page simulator.

use std::fmt;

/// Waterfall zoom presets understood by `wfset()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterfallZoom {
    /// Zoom out completely (whole receiver span)
    Max,
    /// Zoom to the band around the current frequency
    Band,
}

impl WaterfallZoom {
    /// Argument passed to `wfset()`
    pub fn code(&self) -> u8 {
        match self {
            Self::Max => 2,
            Self::Band => 3,
        }
    }

    /// Inverse of [`code`](Self::code)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Max),
            3 => Some(Self::Band),
            _ => None,
        }
    }
}

/// A call into the WebSDR page
#[derive(Debug, Clone, PartialEq)]
pub enum SdrScript {
    /// `setfreqb(<kHz>)`
    SetFrequency { khz: f64 },
    /// `set_mode('<mode>')`
    SetMode(String),
    /// `wfset(<n>)`
    SetZoom(WaterfallZoom),
    /// Waterfall height and scroll speed, stretched and stored
    DisplaySettings { height: u32, speed: u32 },
}

impl SdrScript {
    /// Frequency call for a value in Hz
    pub fn set_frequency_hz(hz: f64) -> Self {
        Self::SetFrequency {
            khz: hz_to_khz(hz),
        }
    }

    /// Render to the JavaScript source executed in the page
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Parse rendered JavaScript back into a call
    pub fn parse(script: &str) -> Option<Self> {
        let script = script.trim().trim_end_matches(';');

        if let Some(arg) = call_arg(script, "setfreqb") {
            return arg.parse().ok().map(|khz| Self::SetFrequency { khz });
        }
        if let Some(arg) = call_arg(script, "set_mode") {
            let mode = arg.strip_prefix('\'')?.strip_suffix('\'')?;
            return Some(Self::SetMode(unescape(mode)));
        }
        if let Some(arg) = call_arg(script, "wfset") {
            return arg.parse().ok().and_then(WaterfallZoom::from_code).map(Self::SetZoom);
        }
        if script.starts_with("waterfallheight(") {
            let mut calls = script.split(';').map(str::trim);
            let height = calls.next().and_then(|c| call_arg(c, "waterfallheight"))?;
            let speed = calls.next().and_then(|c| call_arg(c, "waterfallspeed"))?;
            return Some(Self::DisplaySettings {
                height: height.parse().ok()?,
                speed: speed.parse().ok()?,
            });
        }

        None
    }
}

impl fmt::Display for SdrScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetFrequency { khz } => write!(f, "setfreqb({:.2})", khz),
            Self::SetMode(mode) => write!(f, "set_mode('{}')", escape(mode)),
            Self::SetZoom(zoom) => write!(f, "wfset({})", zoom.code()),
            Self::DisplaySettings { height, speed } => write!(
                f,
                "waterfallheight({}); waterfallspeed({}); stretch_waterfalls(); settings_store();",
                height, speed
            ),
        }
    }
}

/// Convert Hz to the page's display unit
pub fn hz_to_khz(hz: f64) -> f64 {
    hz / 1000.0
}

/// Convert the page's display unit to Hz
pub fn khz_to_hz(khz: f64) -> f64 {
    khz * 1000.0
}

/// Extract the argument text of `name(arg)`
fn call_arg<'a>(script: &'a str, name: &str) -> Option<&'a str> {
    script
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
        .map(str::trim)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

fn unescape(s: &str) -> String {
    s.replace("\\'", "'").replace("\\\\", "\\")
}
