//! Serial log lines.
//!
//! Every line carries the build stamp, a level and the source location:
//!
//! ```text
//! [2026-10-19 08:14:02] INFO  src/reader.rs:97 ➤ Initializing RFID-RC522
//! ```
//!
//! Write errors on the serial handle are dropped, the same way every
//! `uwriteln!` call in the driver ends in `.ok()`.

use ufmt::{uDisplay, uWrite, Formatter};

/// Build identifier stamped on every log line: the UTC build time written by
/// `build.rs`. Falls back to the crate version when compiled without it.
pub const BUILD_STAMP: &str = match option_env!("BUILD_STAMP") {
    Some(stamp) => stamp,
    None => env!("CARGO_PKG_VERSION"),
};

const RULE: &str = "════════════════════════════════════════════";

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO ",
            Level::Warn => "WARN ",
            Level::Error => "ERROR",
        }
    }
}

#[doc(hidden)]
pub fn prefix<W: uWrite>(serial: &mut W, level: Level, file: &str, line: u32) {
    ufmt::uwrite!(serial, "[{}] {} {}:{} ➤ ", BUILD_STAMP, level.tag(), file, line).ok();
}

#[doc(hidden)]
pub fn header<W: uWrite>(serial: &mut W, title: &str, file: &str, line: u32) {
    ufmt::uwriteln!(serial, "{}", RULE).ok();
    ufmt::uwriteln!(serial, " {}", title).ok();
    ufmt::uwriteln!(serial, " [{}] {}:{}", BUILD_STAMP, file, line).ok();
    ufmt::uwriteln!(serial, "{}", RULE).ok();
}

/// A byte printed as two uppercase hex digits.
#[derive(Clone, Copy)]
pub struct Hex(pub u8);

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

impl Hex {
    pub fn digits(self) -> [u8; 2] {
        [
            HEX_DIGITS[(self.0 >> 4) as usize],
            HEX_DIGITS[(self.0 & 0x0F) as usize],
        ]
    }
}

impl uDisplay for Hex {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let digits = self.digits();
        // Both digits come from HEX_DIGITS, always ASCII.
        f.write_str(core::str::from_utf8(&digits).unwrap_or("??"))
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_record {
    ($serial:expr, $level:expr, $($arg:tt)+) => {{
        $crate::log::prefix(&mut *$serial, $level, file!(), line!());
        ufmt::uwriteln!($serial, $($arg)+).ok();
    }};
}

#[macro_export]
macro_rules! log_info {
    ($serial:expr, $($arg:tt)+) => {
        $crate::__log_record!($serial, $crate::log::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($serial:expr, $($arg:tt)+) => {
        $crate::__log_record!($serial, $crate::log::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($serial:expr, $($arg:tt)+) => {
        $crate::__log_record!($serial, $crate::log::Level::Error, $($arg)+)
    };
}

/// Only printed when the configuration has `debug_mode` set.
#[macro_export]
macro_rules! log_debug {
    ($config:expr, $serial:expr, $($arg:tt)+) => {
        if $config.debug_mode {
            $crate::__log_record!($serial, $crate::log::Level::Debug, $($arg)+)
        }
    };
}

/// Framed section header with the build stamp and source location.
#[macro_export]
macro_rules! banner {
    ($serial:expr, $title:expr) => {
        $crate::log::header(&mut *$serial, $title, file!(), line!())
    };
}
