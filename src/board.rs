// src/board.rs

//! Arduino Mega 2560 implementations of the library's hardware traits.

use core::convert::Infallible;
use core::mem;

use arduino_hal::adc::Channel;
use arduino_hal::port::mode::{Floating, Input, Output, PullUp};
use arduino_hal::port::Pin;
use embedded_hal::digital::{ErrorType, OutputPin};

use mega_rfid_station::eeprom::ByteStore;
use mega_rfid_station::probe::{AnalogInput, BoardPin, PinBank};

/// First analog pin number (A0).
const FIRST_ANALOG: u8 = 54;

enum Mode {
    Floating(Pin<Input<Floating>>),
    PullUp(Pin<Input<PullUp>>),
    Output(Pin<Output>),
    // Only seen while a mode change is in flight
    Switching,
}

/// A type-erased GPIO whose direction is chosen at run time.
pub struct BoardIo {
    number: u8,
    mode: Mode,
}

impl BoardIo {
    pub fn new(number: u8, pin: Pin<Input<Floating>>) -> Self {
        BoardIo {
            number,
            mode: Mode::Floating(pin),
        }
    }
}

impl BoardPin for BoardIo {
    fn number(&self) -> u8 {
        self.number
    }

    fn set_output(&mut self, high: bool) {
        let mut pin = match mem::replace(&mut self.mode, Mode::Switching) {
            Mode::Floating(pin) => pin.into_output(),
            Mode::PullUp(pin) => pin.into_output(),
            Mode::Output(pin) => pin,
            Mode::Switching => return,
        };
        if high {
            pin.set_high();
        } else {
            pin.set_low();
        }
        self.mode = Mode::Output(pin);
    }

    fn set_input(&mut self, pull_up: bool) {
        self.mode = match mem::replace(&mut self.mode, Mode::Switching) {
            Mode::Floating(pin) if pull_up => Mode::PullUp(pin.into_pull_up_input()),
            Mode::PullUp(pin) if !pull_up => Mode::Floating(pin.into_floating_input()),
            Mode::Output(pin) if pull_up => Mode::PullUp(pin.into_pull_up_input()),
            Mode::Output(pin) => Mode::Floating(pin.into_floating_input()),
            unchanged => unchanged,
        };
    }

    fn is_high(&mut self) -> bool {
        match &self.mode {
            Mode::Floating(pin) => pin.is_high(),
            Mode::PullUp(pin) => pin.is_high(),
            // Push-pull outputs only expose the output latch
            Mode::Output(pin) => pin.is_set_high(),
            Mode::Switching => false,
        }
    }
}

impl ErrorType for BoardIo {
    type Error = Infallible;
}

impl OutputPin for BoardIo {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_output(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_output(true);
        Ok(())
    }
}

/// Pins handed to the boot-time probes. Pins taken out with `take` are
/// reported as in use by later scans.
pub struct MegaBank<const N: usize> {
    pins: [Option<BoardIo>; N],
}

impl<const N: usize> MegaBank<N> {
    pub fn new(pins: [Option<BoardIo>; N]) -> Self {
        MegaBank { pins }
    }

    pub fn take(&mut self, number: u8) -> Option<BoardIo> {
        self.pins
            .iter_mut()
            .find(|slot| matches!(slot, Some(io) if io.number == number))?
            .take()
    }
}

impl<const N: usize> PinBank for MegaBank<N> {
    type Pin = BoardIo;

    fn pin(&mut self, number: u8) -> Option<&mut BoardIo> {
        self.pins.iter_mut().flatten().find(|io| io.number == number)
    }
}

pub struct AnalogBank {
    adc: arduino_hal::Adc,
    channels: [Channel; 16],
}

impl AnalogBank {
    pub fn new(adc: arduino_hal::Adc, channels: [Channel; 16]) -> Self {
        AnalogBank { adc, channels }
    }
}

impl AnalogInput for AnalogBank {
    fn sample(&mut self, number: u8) -> Option<u16> {
        let index = number.checked_sub(FIRST_ANALOG)? as usize;
        let channel = self.channels.get(index)?;
        Some(self.adc.read_blocking(channel))
    }
}

pub struct Storage {
    eeprom: arduino_hal::Eeprom,
}

impl Storage {
    pub fn new(eeprom: arduino_hal::Eeprom) -> Self {
        Storage { eeprom }
    }
}

impl ByteStore for Storage {
    fn read_byte(&mut self, address: u16) -> u8 {
        self.eeprom.read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.eeprom.write_byte(address, value);
    }
}
