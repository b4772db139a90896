//! RFID-RC522 reader: bring-up sequence, status check and tag detection.
//!
//! Every failure is logged where it happens and the reader stays usable in
//! whatever degraded state it ended up in. Nothing here aborts the program.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use ufmt::{uDebug, uWrite, uwriteln};

use crate::card_types::{PiccType, TagKind};
use crate::config::SystemConfig;
use crate::errors::Fault;
use crate::firmware::{FirmwareClass, VersionDump};
use crate::interface::RegisterAccess;
use crate::log::Hex;
use crate::pinout::ReaderPins;
use crate::registers::{TX_CONTROL_ANTENNA, TX_CONTROL_REG, TX_MODE_REG};
use crate::rfid_rc522::RfidRc522;
use crate::uid::Uid;

/// Antenna-on commands issued when the antenna is found off after init.
pub const ANTENNA_ATTEMPTS: u8 = 2;
/// Pause after reset and init before the chip is queried.
pub const SETTLE_MS: u32 = 50;
/// Pattern written to TxModeReg by the SPI echo test.
pub const ECHO_PATTERN: u8 = 0x55;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReaderState {
    Uninitialized,
    AntennaOff,
    Ready,
    Faulted,
}

impl ReaderState {
    fn as_str(&self) -> &'static str {
        match self {
            ReaderState::Uninitialized => "Uninitialized",
            ReaderState::AntennaOff => "AntennaOff",
            ReaderState::Ready => "Ready",
            ReaderState::Faulted => "Faulted",
        }
    }
}

impl uDebug for ReaderState {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BringUpReport {
    pub version: u8,
    pub firmware: FirmwareClass,
    /// Antenna-on commands issued by the retry step, 0 when it was already on.
    pub antenna_attempts: u8,
    pub antenna_on: bool,
    pub self_test_passed: bool,
    pub state: ReaderState,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DetectedTag {
    pub uid: Uid,
    pub picc_type: PiccType,
}

impl DetectedTag {
    pub fn kind(&self) -> TagKind {
        self.picc_type.kind()
    }
}

pub struct RfidReader<I, D, RST> {
    chip: RfidRc522<I, D>,
    rst: RST,
    pins: ReaderPins,
    state: ReaderState,
    halt_after_read: bool,
}

impl<I, D, RST> RfidReader<I, D, RST>
where
    I: RegisterAccess,
    D: DelayNs,
    RST: OutputPin,
{
    pub fn new(chip: RfidRc522<I, D>, rst: RST, pins: ReaderPins, config: &SystemConfig) -> Self {
        RfidReader {
            chip,
            rst,
            pins,
            state: ReaderState::Uninitialized,
            halt_after_read: config.halt_after_read,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn pins(&self) -> &ReaderPins {
        &self.pins
    }

    pub fn chip(&mut self) -> &mut RfidRc522<I, D> {
        &mut self.chip
    }

    pub fn free(self) -> (RfidRc522<I, D>, RST) {
        (self.chip, self.rst)
    }

    /// Full bring-up: bus, reset and init, antenna, firmware version, antenna
    /// retry, self-test. Runs to completion whatever fails along the way.
    pub fn bring_up<W: uWrite>(&mut self, config: &SystemConfig, serial: &mut W) -> BringUpReport {
        log_info!(serial, "Initializing RFID-RC522");

        // Bus idle, then a hardware reset pulse on RST
        self.chip.release_bus();
        self.rst.set_low().ok();
        self.chip.delay_ms(SETTLE_MS);
        self.rst.set_high().ok();
        self.chip.delay_ms(SETTLE_MS);

        self.chip.init();
        self.chip.delay_ms(SETTLE_MS);
        self.chip.antenna_on();

        banner!(serial, "RFID-RC522 Initialization Information");
        self.print_pin_map(serial);

        let version = self.chip.version();
        log_debug!(config, serial, "VersionReg = 0x{}", Hex(version));
        let firmware = FirmwareClass::classify(version);
        match firmware {
            FirmwareClass::NoCommunication => {
                log_error!(
                    serial,
                    "{:?}: ❌ No communication with the MFRC522 reader (VersionReg 0x{})",
                    Fault::NoCommunication,
                    Hex(version)
                );
            }
            FirmwareClass::Genuine(v) => {
                uwriteln!(serial, "✅ MFRC522 detected. Firmware Version: {}", VersionDump(v)).ok();
            }
            FirmwareClass::NonStandard(v) => {
                uwriteln!(serial, "✅ MFRC522 detected. Firmware Version: {}", VersionDump(v)).ok();
                log_warn!(serial, "⚠ Non-standard firmware version (clone or variant). Proceeding...");
            }
        }

        let (antenna_on, antenna_attempts) = self.ensure_antenna(config, serial);

        self.state = if firmware.communicates() && antenna_on {
            ReaderState::Ready
        } else {
            ReaderState::Faulted
        };

        let self_test_passed = self.self_test(serial);

        if self.state == ReaderState::Faulted {
            log_error!(serial, "Reader state: {:?}, continuing in degraded mode", self.state);
        } else {
            log_info!(serial, "Reader state: {:?}", self.state);
        }

        BringUpReport {
            version,
            firmware,
            antenna_attempts,
            antenna_on,
            self_test_passed,
            state: self.state,
        }
    }

    /// Returns whether the antenna ended up on and how many antenna-on
    /// commands the retry step issued.
    fn ensure_antenna<W: uWrite>(&mut self, config: &SystemConfig, serial: &mut W) -> (bool, u8) {
        let tx_control = self.chip.read_register(TX_CONTROL_REG);
        log_debug!(config, serial, "TxControlReg = 0x{}", Hex(tx_control));
        if tx_control & TX_CONTROL_ANTENNA != 0 {
            uwriteln!(serial, "📡 Antenna is already ON.").ok();
            return (true, 0);
        }

        self.state = ReaderState::AntennaOff;
        uwriteln!(serial, "📡 Antenna is OFF. Attempting to power ON...").ok();
        for attempt in 1..=ANTENNA_ATTEMPTS {
            self.chip.antenna_on();
            if self.chip.antenna_enabled() {
                if attempt == 1 {
                    uwriteln!(serial, "✅ Antenna powered ON successfully.").ok();
                } else {
                    uwriteln!(serial, "✅ Antenna powered ON after retry.").ok();
                }
                return (true, attempt);
            }
            if attempt < ANTENNA_ATTEMPTS {
                log_warn!(serial, "⚠ Retry: powering antenna ON...");
            }
        }

        log_error!(
            serial,
            "{:?}: ❌ Antenna power-on failed after {} attempts. Check wiring or replace reader.",
            Fault::AntennaOff,
            ANTENNA_ATTEMPTS
        );
        (false, ANTENNA_ATTEMPTS)
    }

    /// Built-in self-test with an operator-facing report. Does not change
    /// the reader state.
    pub fn self_test<W: uWrite>(&mut self, serial: &mut W) -> bool {
        banner!(serial, "RFID-RC522 Self-Test");

        let passed = self.chip.perform_self_test();
        if passed {
            uwriteln!(serial, "✅ Self-test successful:").ok();
            uwriteln!(serial, "   • FIFO memory: PASS").ok();
            uwriteln!(serial, "   • Internal CRC generator: PASS").ok();
            uwriteln!(serial, "   • RF Modulator/Demodulator: PASS").ok();
            uwriteln!(serial, "   • Internal oscillator: PASS").ok();
            uwriteln!(serial, "💡 The MFRC522 reader is ready for normal operation.").ok();
        } else {
            log_error!(serial, "{:?}: ❌ Self-test FAILED", Fault::SelfTestFailed);
            uwriteln!(serial, "   • Self-test pattern does not match the NXP reference; possible clone.").ok();
            uwriteln!(serial, "   • At least one internal block did not pass verification.").ok();
            uwriteln!(serial, "   • Potential causes:").ok();
            uwriteln!(serial, "       - Incorrect or loose wiring.").ok();
            uwriteln!(serial, "       - Damaged or incomplete clone module.").ok();
            uwriteln!(serial, "       - Unstable or incorrect supply voltage.").ok();
            uwriteln!(serial, "       - Firmware or silicon variant not matching NXP reference.").ok();
            uwriteln!(serial, "🛠  Recommendation: Check connections, restart, and re-run the test.").ok();
            uwriteln!(
                serial,
                "ℹ  For suspected clones: compare register dump with NXP's documented values for genuine MFRC522."
            )
            .ok();
        }
        passed
    }

    pub fn print_pin_map<W: uWrite>(&self, serial: &mut W) {
        uwriteln!(serial, "🔧 [Pin Mapping] RFID-RC522 hardware pins:").ok();
        for (role, number) in self.pins.roles() {
            uwriteln!(serial, " - {}: {}", role, number).ok();
        }
        serial.write_str("\n").ok();
    }

    /// Version check plus an SPI echo through TxModeReg. Returns whether the
    /// sensor is usable.
    pub fn status<W: uWrite>(&mut self, serial: &mut W) -> bool {
        log_info!(serial, "Checking RFID-RC522 sensor status");
        uwriteln!(serial, "📡 Reading RC522 firmware version...").ok();

        let version = self.chip.version();
        uwriteln!(serial, "Firmware Version: {}", VersionDump(version)).ok();

        let mut operational = match FirmwareClass::classify(version) {
            FirmwareClass::Genuine(_) => {
                uwriteln!(serial, "✅ Sensor OK - standard MFRC522 detected.").ok();
                true
            }
            FirmwareClass::NoCommunication => {
                log_error!(
                    serial,
                    "{:?}: ❌ Communication failure. Check wiring, power and SPI.",
                    Fault::NoCommunication
                );
                false
            }
            FirmwareClass::NonStandard(v) => {
                log_warn!(serial, "⚠ Non-standard version detected: 0x{}", Hex(v));
                uwriteln!(serial, "   May be a clone. Operation not guaranteed.").ok();
                true
            }
        };

        let previous = self.chip.read_register(TX_MODE_REG);
        self.chip.write_register(TX_MODE_REG, ECHO_PATTERN);
        let echoed = self.chip.read_register(TX_MODE_REG);
        self.chip.write_register(TX_MODE_REG, previous);

        uwriteln!(serial, "Written: 0x{} - Read: 0x{}", Hex(ECHO_PATTERN), Hex(echoed)).ok();
        if echoed == ECHO_PATTERN {
            uwriteln!(serial, "✅ SPI communication verified in both directions.").ok();
        } else {
            log_warn!(serial, "⚠ Echo error: possible fault on MOSI or MISO lines.");
            operational = false;
        }

        if operational {
            uwriteln!(serial, "🚀 Sensor ready for use.").ok();
        } else {
            uwriteln!(serial, "⛔ Sensor not operational.").ok();
        }
        operational
    }

    /// One non-blocking detection poll.
    pub fn detect<W: uWrite>(&mut self, serial: &mut W) -> Option<DetectedTag> {
        self.read_tag(serial).ok()
    }

    fn read_tag<W: uWrite>(&mut self, serial: &mut W) -> Result<DetectedTag, Fault> {
        if !self.chip.is_new_card_present() {
            log_info!(serial, "{:?}: ⏳ No card in the field", Fault::NoCard);
            return Err(Fault::NoCard);
        }

        let uid = match self.chip.select() {
            Ok(uid) => uid,
            Err(e) => {
                log_warn!(serial, "{:?}: ⚠ Could not read the card UID ({:?})", Fault::UidReadFailed, e);
                return Err(Fault::UidReadFailed);
            }
        };

        let picc_type = PiccType::from_sak(uid.sak());
        uwriteln!(serial, "UID detected: {}", uid).ok();
        uwriteln!(serial, "Type detected: {}", picc_type).ok();
        match picc_type.kind() {
            TagKind::MifareCard => uwriteln!(serial, "💳 RFID card detected").ok(),
            TagKind::OtherTag => uwriteln!(serial, "🐾 Possible microchip or other tag type").ok(),
        };

        if self.halt_after_read {
            if let Err(e) = self.chip.halt_a() {
                log_warn!(serial, "HLTA not acknowledged ({:?})", e);
            }
            self.chip.stop_crypto1();
        }

        Ok(DetectedTag { uid, picc_type })
    }
}
