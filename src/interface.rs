// src/interface.rs

use core::convert::Infallible;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Register-level access to the MFRC522. Addresses are the pre-shifted
/// constants from `registers`.
pub trait RegisterAccess {
    fn read_register(&mut self, address: u8) -> u8;
    fn write_register(&mut self, address: u8, value: u8);

    /// Raises chip select so the bus is idle before the first transfer.
    fn release(&mut self) {}
}

/// MFRC522 on an SPI bus with a manually driven chip-select line.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiInterface<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin<Error = Infallible>,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        SpiInterface { spi, cs }
    }

    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn transfer(&mut self, frame: [u8; 2]) -> u8 {
        let mut read_buffer = [0u8; 2];
        self.cs.set_low().ok();
        self.spi.transfer(&mut read_buffer, &frame).ok();
        self.spi.flush().ok();
        self.cs.set_high().ok();
        read_buffer[1]
    }
}

impl<SPI, CS> RegisterAccess for SpiInterface<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin<Error = Infallible>,
{
    fn read_register(&mut self, address: u8) -> u8 {
        // MSB set selects a read; bit 0 is always zero.
        self.transfer([(address & 0x7E) | 0x80, 0x00])
    }

    fn write_register(&mut self, address: u8, value: u8) {
        self.transfer([address & 0x7E, value]);
    }

    fn release(&mut self) {
        self.cs.set_high().ok();
    }
}
