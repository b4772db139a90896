use ufmt::{uwriteln, uWrite};

/// Console baud rate.
pub const BAUD_RATE: u32 = 57600;

/// Build-time configuration. Built once at startup and passed by reference
/// to every component that needs it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SystemConfig {
    /// Extra register-level log lines.
    pub debug_mode: bool,
    pub rfid: bool,
    pub led: bool,
    /// Pin, UART and EEPROM checks before the main loop.
    pub diagnostics: bool,
    /// Send HLTA and stop Crypto1 after reading a UID.
    pub halt_after_read: bool,
    pub redraw_menu_on_unknown: bool,
    pub baud_rate: u32,
}

impl SystemConfig {
    pub const fn from_features() -> Self {
        SystemConfig {
            debug_mode: cfg!(feature = "debug-mode"),
            rfid: cfg!(feature = "rfid"),
            led: cfg!(feature = "led"),
            diagnostics: cfg!(feature = "diagnostics"),
            halt_after_read: !cfg!(feature = "keep-session"),
            redraw_menu_on_unknown: cfg!(feature = "redraw-on-unknown"),
            baud_rate: BAUD_RATE,
        }
    }

    pub fn show<W: uWrite>(&self, serial: &mut W) {
        banner!(serial, "System configuration");
        uwriteln!(serial, " - Debug mode        : {}", on_off(self.debug_mode)).ok();
        uwriteln!(serial, " - RFID-RC522        : {}", on_off(self.rfid)).ok();
        uwriteln!(serial, " - LED               : {}", on_off(self.led)).ok();
        uwriteln!(serial, " - Diagnostics       : {}", on_off(self.diagnostics)).ok();
        uwriteln!(serial, " - Halt after read   : {}", on_off(self.halt_after_read)).ok();
        uwriteln!(serial, " - Menu after unknown: {}", on_off(self.redraw_menu_on_unknown)).ok();
        uwriteln!(serial, " - Baud rate         : {}", self.baud_rate).ok();
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig::from_features()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}
