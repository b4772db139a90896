//! Host-side stand-ins for the board: a simulated MFRC522, a serial capture
//! and fake pins, ADC and EEPROM.

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use ufmt::uWrite;

use crate::commands::*;
use crate::config::{SystemConfig, BAUD_RATE};
use crate::eeprom::ByteStore;
use crate::firmware::self_test_reference;
use crate::interface::RegisterAccess;
use crate::probe::{AnalogInput, BoardPin, PinBank};
use crate::registers::*;

/// Configuration independent of the enabled Cargo features.
pub fn test_config() -> SystemConfig {
    SystemConfig {
        debug_mode: false,
        rfid: true,
        led: false,
        diagnostics: false,
        halt_after_read: true,
        redraw_menu_on_unknown: false,
        baud_rate: BAUD_RATE,
    }
}

#[derive(Default)]
pub struct Capture {
    text: String,
}

impl Capture {
    pub fn new() -> Self {
        Capture::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn count(&self, needle: &str) -> usize {
        self.text.matches(needle).count()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl uWrite for Capture {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.text.push_str(s);
        Ok(())
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
    fn delay_us(&mut self, _us: u32) {}
    fn delay_ms(&mut self, _ms: u32) {}
}

#[derive(Default)]
pub struct CountingDelay {
    ns: u64,
}

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        self.ns / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        self.ns += us as u64 * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ns += ms as u64 * 1_000_000;
    }
}

struct FakeCard {
    uid: Vec<u8>,
    sak: u8,
    halted: bool,
}

impl FakeCard {
    fn levels(&self) -> usize {
        match self.uid.len() {
            4 => 1,
            7 => 2,
            _ => 3,
        }
    }

    fn level_index(select: u8) -> Option<usize> {
        match select {
            PICC_CMD_SEL_CL1 => Some(0),
            PICC_CMD_SEL_CL2 => Some(1),
            PICC_CMD_SEL_CL3 => Some(2),
            _ => None,
        }
    }

    /// UID bytes sent at one cascade level, without the BCC.
    fn cascade_part(&self, select: u8) -> Option<[u8; 4]> {
        let index = Self::level_index(select)?;
        if index >= self.levels() {
            return None;
        }
        let start = index * 3;
        let part = if index == self.levels() - 1 {
            [
                self.uid[start],
                self.uid[start + 1],
                self.uid[start + 2],
                self.uid[start + 3],
            ]
        } else {
            [
                PICC_CMD_CT,
                self.uid[start],
                self.uid[start + 1],
                self.uid[start + 2],
            ]
        };
        Some(part)
    }

    fn sak_for(&self, select: u8) -> Option<u8> {
        let index = Self::level_index(select)?;
        if index == self.levels() - 1 {
            Some(self.sak)
        } else {
            Some(0x04)
        }
    }
}

/// Register-level MFRC522 simulation.
///
/// FIFO, interrupt and command registers behave closely enough for the
/// driver's sequences. The CRC coprocessor always yields `0x0000`, so a card
/// answers with a zero CRC unless `with_bad_sak_crc` is set.
pub struct FakeChip {
    regs: [u8; 64],
    version: u8,
    silent: Option<u8>,
    self_test: [u8; 64],
    antenna_stuck: bool,
    ignored_antenna_writes: u8,
    echo_broken: bool,
    collision: bool,
    bad_bcc: bool,
    bad_sak_crc: bool,
    card: Option<FakeCard>,
    tx: Vec<u8>,
    rx: VecDeque<u8>,
    frames: Vec<Vec<u8>>,
}

impl FakeChip {
    fn with_pattern(version: u8, self_test: [u8; 64]) -> Self {
        let mut chip = FakeChip {
            regs: [0; 64],
            version,
            silent: None,
            self_test,
            antenna_stuck: false,
            ignored_antenna_writes: 0,
            echo_broken: false,
            collision: false,
            bad_bcc: false,
            bad_sak_crc: false,
            card: None,
            tx: Vec::new(),
            rx: VecDeque::new(),
            frames: Vec::new(),
        };
        chip.reset();
        chip
    }

    /// A chip that produces the NXP self-test pattern for its version.
    pub fn genuine(version: u8) -> Self {
        let pattern = self_test_reference(version).copied().unwrap_or([0x5A; 64]);
        FakeChip::with_pattern(version, pattern)
    }

    /// A chip whose self-test output differs from every reference.
    pub fn clone_chip(version: u8) -> Self {
        let mut pattern = self_test_reference(version).copied().unwrap_or([0x5A; 64]);
        pattern[1] ^= 0xFF;
        FakeChip::with_pattern(version, pattern)
    }

    /// Nothing on the bus: every read returns `level`, writes are lost.
    pub fn silent(level: u8) -> Self {
        let mut chip = FakeChip::genuine(level);
        chip.silent = Some(level);
        chip
    }

    pub fn with_card(mut self, uid: &[u8], sak: u8) -> Self {
        self.card = Some(FakeCard {
            uid: uid.to_vec(),
            sak,
            halted: false,
        });
        self
    }

    /// Anticollision answers carry a collision error.
    pub fn with_collision(mut self) -> Self {
        self.collision = true;
        self
    }

    /// Anticollision answers carry a BCC that does not match the UID part.
    pub fn with_bad_bcc(mut self) -> Self {
        self.bad_bcc = true;
        self
    }

    /// SAK answers carry a CRC the chip will not reproduce.
    pub fn with_bad_sak_crc(mut self) -> Self {
        self.bad_sak_crc = true;
        self
    }

    pub fn antenna_stuck_off(mut self) -> Self {
        self.antenna_stuck = true;
        self
    }

    /// The first `count` TxControlReg writes are dropped.
    pub fn antenna_ignores_writes(mut self, count: u8) -> Self {
        self.ignored_antenna_writes = count;
        self
    }

    /// TxModeReg always reads back as zero.
    pub fn broken_echo(mut self) -> Self {
        self.echo_broken = true;
        self
    }

    pub fn poke(&mut self, address: u8, value: u8) {
        self.regs[(address >> 1) as usize] = value;
    }

    pub fn saw_frame(&self, frame: &[u8]) -> bool {
        self.frames.iter().any(|sent| sent.as_slice() == frame)
    }

    pub fn saw_frame_starting(&self, prefix: &[u8]) -> bool {
        self.frames.iter().any(|sent| sent.starts_with(prefix))
    }

    fn reg(&mut self, address: u8) -> &mut u8 {
        &mut self.regs[(address >> 1) as usize]
    }

    fn reset(&mut self) {
        self.regs = [0; 64];
        *self.reg(COMMAND_REG) = 0x20;
        *self.reg(TX_CONTROL_REG) = 0x80;
        self.tx.clear();
        self.rx.clear();
    }

    fn run_command(&mut self, command: u8) {
        match command {
            PCD_SOFT_RESET => self.reset(),
            PCD_MEM => self.tx.clear(),
            PCD_CALC_CRC => {
                if *self.reg(AUTO_TEST_REG) == 0x09 {
                    self.rx = self.self_test.iter().copied().collect();
                }
                self.tx.clear();
            }
            _ => {}
        }
    }

    fn exchange(&mut self) {
        let frame = std::mem::take(&mut self.tx);
        self.frames.push(frame.clone());
        self.rx.clear();
        *self.reg(ERROR_REG) = 0;

        match self.respond(&frame) {
            Some(reply) => {
                self.rx.extend(reply);
                *self.reg(COM_IRQ_REG) |= IRQ_RX | IRQ_IDLE;
            }
            None => *self.reg(COM_IRQ_REG) |= IRQ_TIMER,
        }
    }

    fn respond(&mut self, frame: &[u8]) -> Option<Vec<u8>> {
        let collision = self.collision;
        let bad_bcc = self.bad_bcc;
        let bad_sak_crc = self.bad_sak_crc;
        let card = self.card.as_mut()?;
        match frame {
            [PICC_CMD_REQA] if !card.halted => Some(vec![0x04, 0x00]),
            [PICC_CMD_HLTA, ..] => {
                card.halted = true;
                None
            }
            [select, PICC_NVB_ANTICOLL] => {
                let part = card.cascade_part(*select)?;
                let mut bcc = part[0] ^ part[1] ^ part[2] ^ part[3];
                if bad_bcc {
                    bcc ^= 0xFF;
                }
                if collision {
                    self.regs[(ERROR_REG >> 1) as usize] = ERR_COLL;
                }
                Some(vec![part[0], part[1], part[2], part[3], bcc])
            }
            [select, PICC_NVB_SELECT, ..] => {
                let sak = card.sak_for(*select)?;
                if bad_sak_crc {
                    Some(vec![sak, 0x12, 0x34])
                } else {
                    Some(vec![sak, 0x00, 0x00])
                }
            }
            _ => None,
        }
    }
}

impl RegisterAccess for FakeChip {
    fn read_register(&mut self, address: u8) -> u8 {
        if let Some(level) = self.silent {
            return level;
        }
        match address {
            VERSION_REG => self.version,
            FIFO_DATA_REG => self.rx.pop_front().unwrap_or(0),
            FIFO_LEVEL_REG => self.rx.len().min(0x7F) as u8,
            DIV_IRQ_REG => DIV_IRQ_CRC,
            CONTROL_REG => 0,
            TX_MODE_REG if self.echo_broken => 0,
            _ => *self.reg(address),
        }
    }

    fn write_register(&mut self, address: u8, value: u8) {
        if self.silent.is_some() {
            return;
        }
        match address {
            COMMAND_REG => {
                *self.reg(COMMAND_REG) = value;
                self.run_command(value & 0x0F);
            }
            COM_IRQ_REG => {
                // Bit 7 selects set or clear for the marked bits
                let irq = self.reg(COM_IRQ_REG);
                if value & 0x80 != 0 {
                    *irq |= value & 0x7F;
                } else {
                    *irq &= !value;
                }
            }
            FIFO_LEVEL_REG => {
                if value & 0x80 != 0 {
                    self.tx.clear();
                    self.rx.clear();
                }
            }
            FIFO_DATA_REG => self.tx.push(value),
            TX_CONTROL_REG => {
                if self.ignored_antenna_writes > 0 {
                    self.ignored_antenna_writes -= 1;
                    return;
                }
                let value = if self.antenna_stuck {
                    value & !TX_CONTROL_ANTENNA
                } else {
                    value
                };
                *self.reg(TX_CONTROL_REG) = value;
            }
            BIT_FRAMING_REG => {
                *self.reg(BIT_FRAMING_REG) = value;
                let transceiving = *self.reg(COMMAND_REG) & 0x0F == PCD_TRANSCEIVE;
                if value & BIT_FRAMING_START_SEND != 0 && transceiving {
                    self.exchange();
                }
            }
            _ => *self.reg(address) = value,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PinMode {
    Unconfigured,
    Output(bool),
    Input { pull_up: bool },
}

/// A pin that records every mode change. `tied` pins read a fixed level
/// whatever they drive.
pub struct FakePin {
    number: u8,
    mode: PinMode,
    tied: Option<bool>,
    history: Vec<PinMode>,
}

impl FakePin {
    pub fn new(number: u8) -> Self {
        FakePin {
            number,
            mode: PinMode::Unconfigured,
            tied: None,
            history: Vec::new(),
        }
    }

    pub fn tied(mut self, level: bool) -> Self {
        self.tied = Some(level);
        self
    }

    pub fn tie(&mut self, level: bool) {
        self.tied = Some(level);
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    pub fn history(&self) -> &[PinMode] {
        &self.history
    }

    fn switch(&mut self, mode: PinMode) {
        self.mode = mode;
        self.history.push(mode);
    }
}

impl BoardPin for FakePin {
    fn number(&self) -> u8 {
        self.number
    }

    fn set_output(&mut self, high: bool) {
        self.switch(PinMode::Output(high));
    }

    fn set_input(&mut self, pull_up: bool) {
        self.switch(PinMode::Input { pull_up });
    }

    fn is_high(&mut self) -> bool {
        if let Some(level) = self.tied {
            return level;
        }
        match self.mode {
            PinMode::Output(high) => high,
            PinMode::Input { pull_up } => pull_up,
            PinMode::Unconfigured => false,
        }
    }
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_output(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_output(true);
        Ok(())
    }
}

pub struct FakeBank {
    pins: Vec<FakePin>,
}

impl FakeBank {
    pub fn new(numbers: &[u8]) -> Self {
        FakeBank {
            pins: numbers.iter().map(|&n| FakePin::new(n)).collect(),
        }
    }

    pub fn get(&mut self, number: u8) -> Option<&mut FakePin> {
        self.pins.iter_mut().find(|pin| pin.number == number)
    }
}

impl PinBank for FakeBank {
    type Pin = FakePin;

    fn pin(&mut self, number: u8) -> Option<&mut FakePin> {
        self.get(number)
    }
}

pub struct FakeAdc {
    samples: Vec<(u8, u16)>,
}

impl FakeAdc {
    pub fn with(samples: &[(u8, u16)]) -> Self {
        FakeAdc {
            samples: samples.to_vec(),
        }
    }
}

impl AnalogInput for FakeAdc {
    fn sample(&mut self, number: u8) -> Option<u16> {
        self.samples
            .iter()
            .find(|(pin, _)| *pin == number)
            .map(|&(_, raw)| raw)
    }
}

/// Erased EEPROM. Stuck cells ignore writes and always read the same value.
#[derive(Default)]
pub struct FakeEeprom {
    cells: HashMap<u16, u8>,
    stuck: HashMap<u16, u8>,
    log: Vec<(u16, u8)>,
}

impl FakeEeprom {
    pub fn new() -> Self {
        FakeEeprom::default()
    }

    pub fn stuck_at(mut self, address: u16, value: u8) -> Self {
        self.stuck.insert(address, value);
        self
    }

    /// Values written to `address`, oldest first.
    pub fn writes(&self, address: u16) -> Vec<u8> {
        self.log
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|&(_, v)| v)
            .collect()
    }
}

impl ByteStore for FakeEeprom {
    fn read_byte(&mut self, address: u16) -> u8 {
        if let Some(&value) = self.stuck.get(&address) {
            return value;
        }
        self.cells.get(&address).copied().unwrap_or(0xFF)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.log.push((address, value));
        self.cells.insert(address, value);
    }
}
