use embedded_hal::delay::DelayNs;
use ufmt::{uwriteln, uWrite};

use crate::errors::Fault;

/// Value written during the boot-time check.
pub const TEST_VALUE: u8 = 123;
/// Erased EEPROM cells read back as 0xFF.
pub const ERASED: u8 = 0xFF;
pub const TEST_ADDRESS: u16 = 0;

/// Byte-addressed non-volatile storage.
pub trait ByteStore {
    fn read_byte(&mut self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);
}

/// Writes `TEST_VALUE`, reads it back, then clears the cell again. The cell
/// is cleared whether or not the comparison succeeded.
pub fn run_test<S, D, W>(store: &mut S, address: u16, delay: &mut D, serial: &mut W) -> Result<(), Fault>
where
    S: ByteStore,
    D: DelayNs,
    W: uWrite,
{
    log_info!(serial, "🧪 Starting EEPROM diagnostic");

    store.write_byte(address, TEST_VALUE);
    delay.delay_ms(10);
    let read_back = store.read_byte(address);
    uwriteln!(serial, "📥 Value read from EEPROM[{}]: {}", address, read_back).ok();

    let result = if read_back == TEST_VALUE {
        uwriteln!(serial, "✅ EEPROM is responding correctly.").ok();
        Ok(())
    } else {
        log_error!(serial, "{:?}: ❌ EEPROM value mismatch, wrote {} read {}", Fault::EepromMismatch, TEST_VALUE, read_back);
        Err(Fault::EepromMismatch)
    };

    clear(store, address, delay, serial);

    match result {
        Ok(()) => banner!(serial, "EEPROM diagnostic completed"),
        Err(_) => banner!(serial, "EEPROM diagnostic failed"),
    }
    result
}

fn clear<S, D, W>(store: &mut S, address: u16, delay: &mut D, serial: &mut W)
where
    S: ByteStore,
    D: DelayNs,
    W: uWrite,
{
    store.write_byte(address, ERASED);
    delay.delay_ms(10);
    let cleared = store.read_byte(address);
    uwriteln!(serial, "🧹 EEPROM cleared. New value at [{}]: {}", address, cleared).ok();
}
