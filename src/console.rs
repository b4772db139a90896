//! Single-character command console on the primary serial port.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use ufmt::{uWrite, uwriteln};

use crate::config::SystemConfig;
use crate::errors::Fault;
use crate::interface::RegisterAccess;
use crate::reader::RfidReader;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// `A`: sensor status and SPI echo.
    Status,
    /// `B`: one detection cycle.
    Detect,
    /// `C`: reserved.
    Reserved,
    /// `M`: redraw the menu.
    Menu,
    /// Line endings sent by terminals.
    Ignore,
    Unknown(u8),
}

impl Command {
    pub fn parse(byte: u8) -> Self {
        match byte.to_ascii_uppercase() {
            b'A' => Command::Status,
            b'B' => Command::Detect,
            b'C' => Command::Reserved,
            b'M' => Command::Menu,
            b'\n' | b'\r' => Command::Ignore,
            _ => Command::Unknown(byte),
        }
    }
}

/// What the console can ask the RFID subsystem to do.
pub trait ConsoleActions {
    fn run_status<W: uWrite>(&mut self, serial: &mut W);
    fn run_detect<W: uWrite>(&mut self, serial: &mut W);

    fn run_reserved<W: uWrite>(&mut self, serial: &mut W) {
        uwriteln!(serial, "🛠 Command C is reserved, nothing to do.").ok();
    }
}

impl<I, D, RST> ConsoleActions for RfidReader<I, D, RST>
where
    I: RegisterAccess,
    D: DelayNs,
    RST: OutputPin,
{
    fn run_status<W: uWrite>(&mut self, serial: &mut W) {
        self.status(serial);
    }

    fn run_detect<W: uWrite>(&mut self, serial: &mut W) {
        self.detect(serial);
    }
}

/// A subsystem compiled out or never brought up answers every command with
/// a notice instead of touching hardware.
impl<T: ConsoleActions> ConsoleActions for Option<T> {
    fn run_status<W: uWrite>(&mut self, serial: &mut W) {
        match self {
            Some(actions) => actions.run_status(serial),
            None => disabled(serial),
        }
    }

    fn run_detect<W: uWrite>(&mut self, serial: &mut W) {
        match self {
            Some(actions) => actions.run_detect(serial),
            None => disabled(serial),
        }
    }

    fn run_reserved<W: uWrite>(&mut self, serial: &mut W) {
        match self {
            Some(actions) => actions.run_reserved(serial),
            None => disabled(serial),
        }
    }
}

fn disabled<W: uWrite>(serial: &mut W) {
    log_warn!(serial, "RFID subsystem disabled in this build, command ignored");
}

pub fn show_menu<W: uWrite>(serial: &mut W) {
    banner!(serial, "RFID-RC522 menu");
    uwriteln!(serial, " A - Sensor status").ok();
    uwriteln!(serial, " B - Detect card or tag").ok();
    uwriteln!(serial, " C - Reserved").ok();
    uwriteln!(serial, " M - Show this menu").ok();
    serial.write_str("\n").ok();
}

/// Command loop state. Call `poll` once per main-loop iteration with the
/// byte read from the console, if any.
pub struct CommandLoop {
    show_menu: bool,
    redraw_on_unknown: bool,
}

impl CommandLoop {
    pub fn new(config: &SystemConfig) -> Self {
        CommandLoop {
            show_menu: true,
            redraw_on_unknown: config.redraw_menu_on_unknown,
        }
    }

    /// Draws the menu if pending, then dispatches `input`. Returns the parsed
    /// command, `None` when no byte was available.
    pub fn poll<A, W>(&mut self, input: Option<u8>, actions: &mut A, serial: &mut W) -> Option<Command>
    where
        A: ConsoleActions,
        W: uWrite,
    {
        if self.show_menu {
            show_menu(serial);
            self.show_menu = false;
        }

        let command = Command::parse(input?);
        match command {
            Command::Status => actions.run_status(serial),
            Command::Detect => actions.run_detect(serial),
            Command::Reserved => actions.run_reserved(serial),
            Command::Menu => {}
            Command::Ignore => return Some(command),
            Command::Unknown(_) => {
                log_warn!(serial, "{:?}: ⚠ Unknown command. Press 'M' for the menu.", Fault::UnknownCommand);
                if !self.redraw_on_unknown {
                    return Some(command);
                }
            }
        }
        self.show_menu = true;
        Some(command)
    }
}
