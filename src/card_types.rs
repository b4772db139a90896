use core::fmt::{Debug, Formatter, Result};
use ufmt::{uDebug, uDisplay, uWrite};

/// PICC type as announced by the SAK byte of the last select.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PiccType {
    NotComplete,
    MifareMini,
    Mifare1K,
    Mifare4K,
    MifareUltralight,
    MifarePlus,
    Tnp3xxx,
    Iso14443_4,
    Iso18092,
    Unknown,
}

/// Coarse classification printed after a detection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TagKind {
    MifareCard,
    OtherTag,
}

impl PiccType {
    pub fn from_sak(sak: u8) -> Self {
        // Bit 8 of the SAK has no meaning for the type, see NXP AN10833.
        match sak & 0x7F {
            0x04 => PiccType::NotComplete,
            0x09 => PiccType::MifareMini,
            0x08 => PiccType::Mifare1K,
            0x18 => PiccType::Mifare4K,
            0x00 => PiccType::MifareUltralight,
            0x10 | 0x11 => PiccType::MifarePlus,
            0x01 => PiccType::Tnp3xxx,
            0x20 => PiccType::Iso14443_4,
            0x40 => PiccType::Iso18092,
            _ => PiccType::Unknown,
        }
    }

    pub fn kind(&self) -> TagKind {
        match self {
            PiccType::MifareMini | PiccType::Mifare1K | PiccType::Mifare4K => TagKind::MifareCard,
            _ => TagKind::OtherTag,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PiccType::NotComplete => "SAK indicates UID is not complete",
            PiccType::MifareMini => "MIFARE Mini, 320 bytes",
            PiccType::Mifare1K => "MIFARE 1KB",
            PiccType::Mifare4K => "MIFARE 4KB",
            PiccType::MifareUltralight => "MIFARE Ultralight or Ultralight C",
            PiccType::MifarePlus => "MIFARE Plus",
            PiccType::Tnp3xxx => "MIFARE TNP3XXX",
            PiccType::Iso14443_4 => "PICC compliant with ISO/IEC 14443-4",
            PiccType::Iso18092 => "PICC compliant with ISO/IEC 18092 (NFC)",
            PiccType::Unknown => "Unknown type",
        }
    }
}

impl Debug for PiccType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.name())
    }
}

impl uDisplay for PiccType {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

impl uDebug for PiccType {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sak_maps_to_type() {
        assert_eq!(PiccType::from_sak(0x08), PiccType::Mifare1K);
        assert_eq!(PiccType::from_sak(0x88), PiccType::Mifare1K);
        assert_eq!(PiccType::from_sak(0x18), PiccType::Mifare4K);
        assert_eq!(PiccType::from_sak(0x09), PiccType::MifareMini);
        assert_eq!(PiccType::from_sak(0x00), PiccType::MifareUltralight);
        assert_eq!(PiccType::from_sak(0x11), PiccType::MifarePlus);
        assert_eq!(PiccType::from_sak(0x20), PiccType::Iso14443_4);
        assert_eq!(PiccType::from_sak(0x53), PiccType::Unknown);
    }

    #[test]
    fn only_classic_mifare_counts_as_card() {
        assert_eq!(PiccType::Mifare1K.kind(), TagKind::MifareCard);
        assert_eq!(PiccType::Mifare4K.kind(), TagKind::MifareCard);
        assert_eq!(PiccType::MifareMini.kind(), TagKind::MifareCard);
        assert_eq!(PiccType::MifareUltralight.kind(), TagKind::OtherTag);
        assert_eq!(PiccType::Iso14443_4.kind(), TagKind::OtherTag);
        assert_eq!(PiccType::Unknown.kind(), TagKind::OtherTag);
    }
}
