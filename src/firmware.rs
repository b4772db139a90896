//! VersionReg interpretation and the NXP self-test reference patterns.

use ufmt::{uDisplay, uWrite, Formatter};

use crate::log::Hex;

pub const VERSION_V1_0: u8 = 0x91;
pub const VERSION_V2_0: u8 = 0x92;

/// Outcome of reading VersionReg once.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FirmwareClass {
    /// `0x00` or `0xFF`: the bus is floating or stuck, nothing answered.
    NoCommunication,
    /// One of the two documented NXP versions.
    Genuine(u8),
    /// Answers, but with a version NXP never shipped. Usually a clone.
    NonStandard(u8),
}

impl FirmwareClass {
    pub fn classify(version: u8) -> Self {
        match version {
            0x00 | 0xFF => FirmwareClass::NoCommunication,
            VERSION_V1_0 | VERSION_V2_0 => FirmwareClass::Genuine(version),
            other => FirmwareClass::NonStandard(other),
        }
    }

    pub fn communicates(&self) -> bool {
        !matches!(self, FirmwareClass::NoCommunication)
    }
}

/// Human readable name for a VersionReg value.
pub fn describe(version: u8) -> &'static str {
    match version {
        0x88 => "clone",
        0x90 => "v0.0",
        0x91 => "v1.0",
        0x92 => "v2.0",
        0x12 => "counterfeit chip",
        _ => "(unknown)",
    }
}

/// `0x92 = v2.0` style rendering used in the version dump.
pub struct VersionDump(pub u8);

impl uDisplay for VersionDump {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str("0x")?;
        uDisplay::fmt(&Hex(self.0), f)?;
        f.write_str(" = ")?;
        f.write_str(describe(self.0))
    }
}

const SELF_TEST_V1_0: [u8; 64] = [
    0x00, 0xC6, 0x37, 0xD5, 0x32, 0xB7, 0x57, 0x5C, 0xC2, 0xD8, 0x7C, 0x4D, 0xD9, 0x70, 0xC7, 0x73,
    0x10, 0xE6, 0xD2, 0xAA, 0x5E, 0xA1, 0x3E, 0x5A, 0x14, 0xAF, 0x30, 0x61, 0xC9, 0x70, 0xDB, 0x2E,
    0x64, 0x22, 0x72, 0xB5, 0xBD, 0x65, 0xF4, 0xEC, 0x22, 0xBC, 0xD3, 0x72, 0x35, 0xCD, 0xAA, 0x41,
    0x1F, 0xA7, 0xF3, 0x53, 0x14, 0xDE, 0x7E, 0x02, 0xD9, 0x0F, 0xB5, 0x5E, 0x25, 0x1D, 0x29, 0x79,
];

const SELF_TEST_V2_0: [u8; 64] = [
    0x00, 0xEB, 0x66, 0xBA, 0x57, 0xBF, 0x23, 0x95, 0xD0, 0xE3, 0x0D, 0x3D, 0x27, 0x89, 0x5C, 0xDE,
    0x9D, 0x3B, 0xA7, 0x00, 0x21, 0x5B, 0x89, 0x82, 0x51, 0x3A, 0xEB, 0x02, 0x0C, 0xA5, 0x00, 0x49,
    0x7C, 0x84, 0x4D, 0xB3, 0xCC, 0xD2, 0x1B, 0x81, 0x5D, 0x48, 0x76, 0xD5, 0x71, 0x61, 0x21, 0xA9,
    0x86, 0x96, 0x83, 0x38, 0xCF, 0x9D, 0x5B, 0x6D, 0xDC, 0x15, 0xBA, 0x3E, 0x7D, 0x95, 0x3B, 0x2F,
];

/// Expected self-test output for a genuine chip of the given version.
pub fn self_test_reference(version: u8) -> Option<&'static [u8; 64]> {
    match version {
        VERSION_V1_0 => Some(&SELF_TEST_V1_0),
        VERSION_V2_0 => Some(&SELF_TEST_V2_0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Capture;

    #[test]
    fn sentinel_values_mean_no_communication() {
        assert_eq!(FirmwareClass::classify(0x00), FirmwareClass::NoCommunication);
        assert_eq!(FirmwareClass::classify(0xFF), FirmwareClass::NoCommunication);
        assert!(!FirmwareClass::classify(0xFF).communicates());
    }

    #[test]
    fn reference_versions_are_genuine() {
        assert_eq!(FirmwareClass::classify(0x91), FirmwareClass::Genuine(0x91));
        assert_eq!(FirmwareClass::classify(0x92), FirmwareClass::Genuine(0x92));
    }

    #[test]
    fn every_other_byte_is_non_standard() {
        for version in 0x01..=0xFEu8 {
            if version == 0x91 || version == 0x92 {
                continue;
            }
            assert_eq!(
                FirmwareClass::classify(version),
                FirmwareClass::NonStandard(version)
            );
        }
    }

    #[test]
    fn references_exist_only_for_genuine_versions() {
        assert!(self_test_reference(0x91).is_some());
        assert!(self_test_reference(0x92).is_some());
        assert!(self_test_reference(0x88).is_none());
    }

    #[test]
    fn version_dump_names_the_chip() {
        let mut out = Capture::new();
        ufmt::uwrite!(&mut out, "{}", VersionDump(0x92)).ok();
        assert_eq!(out.text(), "0x92 = v2.0");
        out.clear();
        ufmt::uwrite!(&mut out, "{}", VersionDump(0x12)).ok();
        assert_eq!(out.text(), "0x12 = counterfeit chip");
    }
}
