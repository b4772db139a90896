use embedded_hal::delay::DelayNs;

use crate::commands::*;
use crate::errors::RfidError;
use crate::firmware::self_test_reference;
use crate::interface::RegisterAccess;
use crate::registers::*;
use crate::uid::Uid;

/// Iterations of the ComIrqReg poll before a transceive is abandoned. The
/// chip's own timer (25 ms, set up in `init`) normally fires first.
const TRANSCEIVE_POLLS: u16 = 2000;
const TRANSCEIVE_POLL_US: u32 = 20;
const CRC_POLLS: u16 = 100;
const RESET_POLLS: u8 = 3;
const SELF_TEST_POLLS: u16 = 0xFF;

/// Bytes produced by the digital self-test.
pub const SELF_TEST_LEN: usize = 64;

pub struct RfidRc522<I, D> {
    iface: I,
    delay: D,
}

impl<I, D> RfidRc522<I, D>
where
    I: RegisterAccess,
    D: DelayNs,
{
    pub fn new(iface: I, delay: D) -> Self {
        RfidRc522 { iface, delay }
    }

    pub fn free(self) -> (I, D) {
        (self.iface, self.delay)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    pub fn read_register(&mut self, address: u8) -> u8 {
        self.iface.read_register(address)
    }

    pub fn write_register(&mut self, address: u8, value: u8) {
        self.iface.write_register(address, value);
    }

    pub fn set_bits(&mut self, address: u8, mask: u8) {
        let current = self.read_register(address);
        self.write_register(address, current | mask);
    }

    pub fn clear_bits(&mut self, address: u8, mask: u8) {
        let current = self.read_register(address);
        self.write_register(address, current & !mask);
    }

    /// Idles the bus so the first transfer starts from a clean chip-select edge.
    pub fn release_bus(&mut self) {
        self.iface.release();
    }

    /// Soft reset, then wait for the power-down bit to clear.
    pub fn soft_reset(&mut self) {
        self.write_register(COMMAND_REG, PCD_SOFT_RESET);
        for _ in 0..RESET_POLLS {
            self.delay.delay_ms(50);
            if self.read_register(COMMAND_REG) & COMMAND_POWER_DOWN == 0 {
                break;
            }
        }
    }

    /// Soft reset and the register setup every later operation relies on.
    pub fn init(&mut self) {
        self.soft_reset();

        // Reset baud rates
        self.write_register(TX_MODE_REG, 0x00);
        self.write_register(RX_MODE_REG, 0x00);
        // Reset ModWidthReg
        self.write_register(MOD_WIDTH_REG, 0x26);

        // Timer: TAuto=1, f = 6.78MHz / 3390 = 2kHz, reload 1000 -> 25ms timeout
        self.write_register(T_MODE_REG, 0x80);
        self.write_register(T_PRESCALER_REG, 0xA9);
        self.write_register(T_RELOAD_REG_H, 0x03);
        self.write_register(T_RELOAD_REG_L, 0xE8);

        self.write_register(TX_ASK_REG, 0x40); // 100% ASK
        self.write_register(MODE_REG, 0x3D); // CRC preset to 0x6363
        self.antenna_on();
    }

    pub fn version(&mut self) -> u8 {
        self.read_register(VERSION_REG)
    }

    pub fn antenna_on(&mut self) {
        let current = self.read_register(TX_CONTROL_REG);
        if (current & TX_CONTROL_ANTENNA) != TX_CONTROL_ANTENNA {
            self.write_register(TX_CONTROL_REG, current | TX_CONTROL_ANTENNA);
        }
    }

    pub fn antenna_off(&mut self) {
        self.clear_bits(TX_CONTROL_REG, TX_CONTROL_ANTENNA);
    }

    /// True when at least one of the TX1/TX2 drivers is enabled.
    pub fn antenna_enabled(&mut self) -> bool {
        self.read_register(TX_CONTROL_REG) & TX_CONTROL_ANTENNA != 0
    }

    /// Runs the chip's digital self-test and compares the 64-byte result with
    /// the reference pattern for the reported version. Re-initialises the
    /// chip afterwards since the test leaves it in a reset state.
    pub fn perform_self_test(&mut self) -> bool {
        self.soft_reset();

        // Clear the internal buffer by writing 25 bytes of 00h
        self.write_register(FIFO_LEVEL_REG, 0x80);
        for _ in 0..25 {
            self.write_register(FIFO_DATA_REG, 0x00);
        }
        self.write_register(COMMAND_REG, PCD_MEM);

        // Enable self-test and start it through a CRC calculation on a 00h byte
        self.write_register(AUTO_TEST_REG, 0x09);
        self.write_register(FIFO_DATA_REG, 0x00);
        self.write_register(COMMAND_REG, PCD_CALC_CRC);

        for _ in 0..SELF_TEST_POLLS {
            if self.read_register(FIFO_LEVEL_REG) as usize >= SELF_TEST_LEN {
                break;
            }
            self.delay.delay_us(100);
        }
        self.write_register(COMMAND_REG, PCD_IDLE);

        let mut result = [0u8; SELF_TEST_LEN];
        for byte in result.iter_mut() {
            *byte = self.read_register(FIFO_DATA_REG);
        }
        self.write_register(AUTO_TEST_REG, 0x00);

        let version = self.version();
        let passed = match self_test_reference(version) {
            Some(reference) => result == *reference,
            None => false,
        };

        self.init();
        passed
    }

    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2], RfidError> {
        self.write_register(COMMAND_REG, PCD_IDLE);
        self.write_register(DIV_IRQ_REG, DIV_IRQ_CRC); // Clear CRC interrupt
        self.write_register(FIFO_LEVEL_REG, 0x80); // Flush FIFO

        for &byte in data {
            self.write_register(FIFO_DATA_REG, byte);
        }
        self.write_register(COMMAND_REG, PCD_CALC_CRC);

        for _ in 0..CRC_POLLS {
            if self.read_register(DIV_IRQ_REG) & DIV_IRQ_CRC != 0 {
                self.write_register(COMMAND_REG, PCD_IDLE);
                return Ok([
                    self.read_register(CRC_RESULT_REG_L),
                    self.read_register(CRC_RESULT_REG_H),
                ]);
            }
            self.delay.delay_us(100);
        }
        Err(RfidError::Timeout)
    }

    /// Sends `send` to the PICC and collects the answer into `back`.
    ///
    /// `valid_bits` holds the number of bits to send from the last byte
    /// (0 = whole byte) and returns the number of valid bits in the last
    /// received byte. Returns the number of bytes received.
    pub fn transceive(
        &mut self,
        send: &[u8],
        back: &mut [u8],
        valid_bits: &mut u8,
    ) -> Result<usize, RfidError> {
        let bit_framing = *valid_bits & 0x07;

        self.write_register(COMMAND_REG, PCD_IDLE);
        self.write_register(COM_IRQ_REG, 0x7F); // Clear all interrupt request bits
        self.write_register(FIFO_LEVEL_REG, 0x80); // Flush FIFO
        for &byte in send {
            self.write_register(FIFO_DATA_REG, byte);
        }
        self.write_register(BIT_FRAMING_REG, bit_framing);
        self.write_register(COMMAND_REG, PCD_TRANSCEIVE);
        self.set_bits(BIT_FRAMING_REG, BIT_FRAMING_START_SEND);

        let mut completed = false;
        for _ in 0..TRANSCEIVE_POLLS {
            let irq = self.read_register(COM_IRQ_REG);
            if irq & (IRQ_RX | IRQ_IDLE) != 0 {
                completed = true;
                break;
            }
            if irq & IRQ_TIMER != 0 {
                return Err(RfidError::Timeout);
            }
            self.delay.delay_us(TRANSCEIVE_POLL_US);
        }
        self.clear_bits(BIT_FRAMING_REG, BIT_FRAMING_START_SEND);
        if !completed {
            return Err(RfidError::Timeout);
        }

        let error = self.read_register(ERROR_REG);
        if error & ERR_FATAL != 0 {
            return Err(RfidError::Error);
        }

        let level = self.read_register(FIFO_LEVEL_REG) as usize;
        if level > back.len() {
            return Err(RfidError::NoRoom);
        }
        for byte in back.iter_mut().take(level) {
            *byte = self.read_register(FIFO_DATA_REG);
        }
        *valid_bits = self.read_register(CONTROL_REG) & 0x07;

        if error & ERR_COLL != 0 {
            return Err(RfidError::Collision);
        }
        Ok(level)
    }

    /// REQA as a 7-bit short frame. Returns the two ATQA bytes.
    pub fn request_a(&mut self) -> Result<[u8; 2], RfidError> {
        self.clear_bits(COLL_REG, COLL_VALUES_AFTER_COLL);
        let mut atqa = [0u8; 2];
        let mut valid_bits = 7;
        let received = self.transceive(&[PICC_CMD_REQA], &mut atqa, &mut valid_bits)?;
        if received != 2 || valid_bits != 0 {
            return Err(RfidError::InvalidResponse);
        }
        Ok(atqa)
    }

    /// True when a card in IDLE state answers REQA. Cards that were halted
    /// stay silent until they leave the field.
    pub fn is_new_card_present(&mut self) -> bool {
        self.write_register(TX_MODE_REG, 0x00);
        self.write_register(RX_MODE_REG, 0x00);
        self.write_register(MOD_WIDTH_REG, 0x26);

        matches!(self.request_a(), Ok(_) | Err(RfidError::Collision))
    }

    /// Anticollision and select over up to three cascade levels.
    ///
    /// Bit collisions are not resolved; with two cards in the field this
    /// returns `RfidError::Collision`.
    pub fn select(&mut self) -> Result<Uid, RfidError> {
        self.clear_bits(COLL_REG, COLL_VALUES_AFTER_COLL);
        let mut uid = Uid::empty();

        for level in [PICC_CMD_SEL_CL1, PICC_CMD_SEL_CL2, PICC_CMD_SEL_CL3] {
            let mut part = [0u8; 5];
            let mut valid_bits = 0;
            let received =
                self.transceive(&[level, PICC_NVB_ANTICOLL], &mut part, &mut valid_bits)?;
            if received != 5 {
                return Err(RfidError::InvalidResponse);
            }
            let bcc = part[0] ^ part[1] ^ part[2] ^ part[3];
            if bcc != part[4] {
                return Err(RfidError::CrcError);
            }

            let mut frame = [
                level,
                PICC_NVB_SELECT,
                part[0],
                part[1],
                part[2],
                part[3],
                part[4],
                0,
                0,
            ];
            let crc = self.calculate_crc(&frame[..7])?;
            frame[7] = crc[0];
            frame[8] = crc[1];

            let mut sak = [0u8; 3];
            let mut valid_bits = 0;
            let received = self.transceive(&frame, &mut sak, &mut valid_bits)?;
            if received != 3 || valid_bits != 0 {
                return Err(RfidError::InvalidResponse);
            }
            let crc = self.calculate_crc(&sak[..1])?;
            if crc != [sak[1], sak[2]] {
                return Err(RfidError::CrcError);
            }

            if part[0] == PICC_CMD_CT {
                uid.extend(&part[1..4]);
            } else {
                uid.extend(&part[..4]);
            }

            // Cascade bit clear: the UID is complete
            if sak[0] & 0x04 == 0 {
                uid.set_sak(sak[0]);
                return Ok(uid);
            }
        }
        Err(RfidError::InvalidResponse)
    }

    /// Puts the selected card into HALT. A card acknowledges HLTA by staying
    /// silent, so a timeout is the success path.
    pub fn halt_a(&mut self) -> Result<(), RfidError> {
        let mut frame = [PICC_CMD_HLTA, 0x00, 0, 0];
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2] = crc[0];
        frame[3] = crc[1];

        let mut back = [0u8; 2];
        let mut valid_bits = 0;
        match self.transceive(&frame, &mut back, &mut valid_bits) {
            Err(RfidError::Timeout) => Ok(()),
            Ok(_) => Err(RfidError::Error),
            Err(e) => Err(e),
        }
    }

    pub fn stop_crypto1(&mut self) {
        self.clear_bits(STATUS2_REG, STATUS2_CRYPTO1_ON);
    }
}
