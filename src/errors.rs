use core::fmt::{Debug, Formatter, Result};
use ufmt::{uDebug, uWrite};

/// Failures reported by the chip driver while talking to the MFRC522 or a PICC.
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum RfidError {
    Timeout,
    InvalidResponse,
    Error,
    CrcError,
    NoRoom,
    Collision,
}

impl RfidError {
    pub fn as_str(&self) -> &'static str {
        match self {
            RfidError::Timeout => "Timeout",
            RfidError::InvalidResponse => "InvalidResponse",
            RfidError::Error => "Error",
            RfidError::CrcError => "CrcError",
            RfidError::NoRoom => "NoRoom",
            RfidError::Collision => "Collision",
        }
    }
}

impl Debug for RfidError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

impl uDebug for RfidError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

/// Board-level fault taxonomy. Every fault is logged where it is detected and
/// the program keeps running.
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum Fault {
    NoCommunication,
    AntennaOff,
    SelfTestFailed,
    UnrecognizedPin,
    NoCard,
    UidReadFailed,
    UnknownCommand,
    EepromMismatch,
}

impl Fault {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fault::NoCommunication => "NoCommunication",
            Fault::AntennaOff => "AntennaOff",
            Fault::SelfTestFailed => "SelfTestFailed",
            Fault::UnrecognizedPin => "UnrecognizedPin",
            Fault::NoCard => "NoCard",
            Fault::UidReadFailed => "UidReadFailed",
            Fault::UnknownCommand => "UnknownCommand",
            Fault::EepromMismatch => "EepromMismatch",
        }
    }
}

impl Debug for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

impl uDebug for Fault {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}
