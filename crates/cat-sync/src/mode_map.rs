//! Radio mode → WebSDR mode translation
//!
//! Hamlib reports a richer mode vocabulary than the WebSDR page offers.
//! Data sub-modes collapse onto their voice sideband, RTTY is received as
//! CW, and anything unrecognized falls back to AM.

/// Mode used for radio modes the page has no counterpart for
pub const DEFAULT_REMOTE_MODE: &str = "AM";

/// Exact-match translation table, radio mode on the left
pub const MODE_TABLE: &[(&str, &str)] = &[
    ("AM", "AM"),
    ("PKTLSB", "LSB"),
    ("LSB", "LSB"),
    ("PKTUSB", "USB"),
    ("USB", "USB"),
    ("CW", "CW"),
    ("RTTY", "CW"),
    ("FM", "FM"),
    ("FM-D", "FM"),
];

/// Translate a hamlib mode name to the WebSDR mode name
///
/// Case-sensitive; total.
pub fn translate(radio_mode: &str) -> &'static str {
    MODE_TABLE
        .iter()
        .find(|(radio, _)| *radio == radio_mode)
        .map(|(_, remote)| *remote)
        .unwrap_or(DEFAULT_REMOTE_MODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_table_entry() {
        for (radio, remote) in MODE_TABLE {
            assert_eq!(translate(radio), *remote, "translating {}", radio);
        }
    }

    #[test]
    fn test_data_modes_collapse() {
        assert_eq!(translate("PKTUSB"), "USB");
        assert_eq!(translate("PKTLSB"), "LSB");
        assert_eq!(translate("RTTY"), "CW");
        assert_eq!(translate("FM-D"), "FM");
    }

    #[test]
    fn test_unmapped_falls_back_to_am() {
        assert_eq!(translate("CWR"), "AM");
        assert_eq!(translate("WFM"), "AM");
        assert_eq!(translate(""), "AM");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(translate("usb"), "AM");
        assert_eq!(translate("Lsb"), "AM");
    }

    proptest! {
        #[test]
        fn unmapped_strings_map_to_default(mode in "[a-zA-Z0-9-]{0,8}") {
            prop_assume!(!MODE_TABLE.iter().any(|(radio, _)| *radio == mode));
            prop_assert_eq!(translate(&mode), DEFAULT_REMOTE_MODE);
        }

        #[test]
        fn translation_is_deterministic(mode in "[A-Z-]{0,6}") {
            prop_assert_eq!(translate(&mode), translate(&mode));
        }
    }
}
