#![cfg_attr(not(test), no_std)]
// src/lib.rs

#[macro_use]
pub mod log;

pub mod registers;
pub mod commands;
pub mod errors;
pub mod card_types;
pub mod uid;
pub mod interface;
pub mod rfid_rc522;
pub mod firmware;
pub mod reader;
pub mod console;
pub mod config;
pub mod pinout;
pub mod probe;
pub mod uart;
pub mod eeprom;
pub mod led;

#[cfg(test)]
mod testing;

pub use config::SystemConfig;
pub use console::{Command, CommandLoop, ConsoleActions};
pub use errors::{Fault, RfidError};
pub use interface::{RegisterAccess, SpiInterface};
pub use reader::{BringUpReport, DetectedTag, ReaderState, RfidReader};
pub use rfid_rc522::RfidRc522;
pub use uid::Uid;
