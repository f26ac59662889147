//! Reply parsing
//!
//! rigctl prints one value per line. A frequency query prints a single
//! number; a mode query prints the mode name followed by the passband.
//! rigctld additionally answers set commands with `RPRT <code>`.

use crate::error::ParseError;

/// Parse a frequency reply into Hz
pub fn parse_frequency(reply: &str) -> Result<f64, ParseError> {
    let line = reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(ParseError::Empty)?;

    // rigctl in extended mode prefixes the value with "Frequency:"
    let token = line.rsplit(':').next().unwrap_or(line).trim();

    match token.parse::<f64>() {
        Ok(hz) if hz.is_finite() && hz >= 0.0 => Ok(hz),
        _ => Err(ParseError::InvalidFrequency(line.to_string())),
    }
}

/// Parse a mode reply into `(mode, bandwidth)`
pub fn parse_mode(reply: &str) -> Result<(String, String), ParseError> {
    let lines: Vec<&str> = reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ParseError::Empty);
    }
    if lines.len() < 2 {
        return Err(ParseError::MissingLines {
            expected: 2,
            actual: lines.len(),
        });
    }

    Ok((lines[0].to_string(), lines[1].to_string()))
}

/// Parse a `RPRT <code>` status line
///
/// Returns the code; zero means success.
pub fn parse_report(line: &str) -> Result<i32, ParseError> {
    let line = line.trim();
    line.strip_prefix("RPRT")
        .and_then(|code| code.trim().parse::<i32>().ok())
        .ok_or_else(|| ParseError::InvalidReport(line.to_string()))
}

/// Returns true if the line is a status line rather than a value
pub fn is_report(line: &str) -> bool {
    line.trim_start().starts_with("RPRT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_frequency() {
        assert_eq!(parse_frequency("14250000\n"), Ok(14_250_000.0));
        assert_eq!(parse_frequency("7100000.5\n"), Ok(7_100_000.5));
    }

    #[test]
    fn test_parse_frequency_extended() {
        assert_eq!(parse_frequency("Frequency: 3573000\n"), Ok(3_573_000.0));
    }

    #[test]
    fn test_parse_frequency_rejects_garbage() {
        assert_eq!(parse_frequency(""), Err(ParseError::Empty));
        assert_eq!(parse_frequency("\n\n"), Err(ParseError::Empty));
        assert!(matches!(
            parse_frequency("Invalid command\n"),
            Err(ParseError::InvalidFrequency(_))
        ));
        assert!(matches!(
            parse_frequency("-100\n"),
            Err(ParseError::InvalidFrequency(_))
        ));
        assert!(matches!(
            parse_frequency("NaN\n"),
            Err(ParseError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn test_parse_mode() {
        let (mode, bw) = parse_mode("PKTUSB\n2400\n").unwrap();
        assert_eq!(mode, "PKTUSB");
        assert_eq!(bw, "2400");
    }

    #[test]
    fn test_parse_mode_short_reply() {
        assert_eq!(
            parse_mode("USB\n"),
            Err(ParseError::MissingLines {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(parse_mode(""), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_report() {
        assert_eq!(parse_report("RPRT 0\n"), Ok(0));
        assert_eq!(parse_report("RPRT -11"), Ok(-11));
        assert!(parse_report("14250000").is_err());
        assert!(is_report("RPRT 0"));
        assert!(!is_report("USB"));
    }

    proptest! {
        #[test]
        fn whole_hertz_replies_parse_exactly(hz in 0u64..10_000_000_000, labelled in any::<bool>()) {
            let reply = if labelled {
                format!("Frequency: {}\n", hz)
            } else {
                format!("{}\n", hz)
            };
            prop_assert_eq!(parse_frequency(&reply), Ok(hz as f64));
        }

        #[test]
        fn mode_without_passband_is_rejected(mode in "[A-Z-]{1,8}") {
            prop_assert_eq!(
                parse_mode(&format!("{}\n", mode)),
                Err(ParseError::MissingLines { expected: 2, actual: 1 })
            );
        }
    }
}
