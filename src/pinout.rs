//! Pin tables for the Arduino Mega 2560.
//!
//! Single place where physical pin numbers live. Every table keeps its
//! numbers unique; the same number may show up in several tables when the
//! silicon shares the pin (INT2..INT5 sit on the I2C and UART1 pins).

/// A symbolic name bound to a physical pin number.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PinInfo {
    pub name: &'static str,
    pub number: u8,
}

const fn pin(name: &'static str, number: u8) -> PinInfo {
    PinInfo { name, number }
}

// ---------------------------------------------------------------------------
// UART
// ---------------------------------------------------------------------------

pub const UART_RX: &[PinInfo] = &[
    pin("PIN_RX0", 0),  // USB serial
    pin("PIN_RX1", 19), // shared with INT4
    pin("PIN_RX2", 17),
    pin("PIN_RX3", 15),
];

pub const UART_TX: &[PinInfo] = &[
    pin("PIN_TX0", 1),
    pin("PIN_TX1", 18), // shared with INT5
    pin("PIN_TX2", 16),
    pin("PIN_TX3", 14),
];

// ---------------------------------------------------------------------------
// SPI (hardware block, SS must stay an output in master mode)
// ---------------------------------------------------------------------------

pub const SPI: &[PinInfo] = &[
    pin("PIN_MISO", 50),
    pin("PIN_MOSI", 51),
    pin("PIN_SCK", 52),
    pin("PIN_SS", 53),
];

// ---------------------------------------------------------------------------
// I2C / TWI
// ---------------------------------------------------------------------------

pub const I2C: &[PinInfo] = &[
    pin("PIN_SDA", 20), // shared with INT3
    pin("PIN_SCL", 21), // shared with INT2
];

// ---------------------------------------------------------------------------
// External interrupts
// ---------------------------------------------------------------------------

pub const INTERRUPTS: &[PinInfo] = &[
    pin("INT_0", 2),
    pin("INT_1", 3),
    pin("INT_2", 21),
    pin("INT_3", 20),
    pin("INT_4", 19),
    pin("INT_5", 18),
];

// ---------------------------------------------------------------------------
// PWM capable outputs
// ---------------------------------------------------------------------------

pub const PWM: &[PinInfo] = &[
    pin("PIN_PWM_2", 2),
    pin("PIN_PWM_3", 3),
    pin("PIN_PWM_4", 4),
    pin("PIN_PWM_5", 5),
    pin("PIN_PWM_6", 6),
    pin("PIN_PWM_7", 7),
    pin("PIN_PWM_8", 8),
    pin("PIN_PWM_9", 9),
    pin("PIN_PWM_10", 10),
    pin("PIN_PWM_11", 11),
    pin("PIN_PWM_12", 12),
    pin("PIN_PWM_13", 13), // on-board LED
    pin("PIN_PWM_44", 44),
    pin("PIN_PWM_45", 45),
    pin("PIN_PWM_46", 46),
];

// ---------------------------------------------------------------------------
// General purpose digital I/O
// ---------------------------------------------------------------------------

pub const GPIO: &[PinInfo] = &[
    pin("PIN_GPIO_22", 22),
    pin("PIN_GPIO_23", 23),
    pin("PIN_GPIO_24", 24),
    pin("PIN_GPIO_25", 25),
    pin("PIN_GPIO_26", 26),
    pin("PIN_GPIO_27", 27),
    pin("PIN_GPIO_28", 28),
    pin("PIN_GPIO_29", 29),
    pin("PIN_GPIO_30", 30),
    pin("PIN_GPIO_31", 31),
    pin("PIN_GPIO_32", 32),
    pin("PIN_GPIO_33", 33),
    pin("PIN_GPIO_34", 34),
    pin("PIN_GPIO_35", 35),
    pin("PIN_GPIO_36", 36),
    pin("PIN_GPIO_37", 37),
    pin("PIN_GPIO_38", 38),
    pin("PIN_GPIO_39", 39),
    pin("PIN_GPIO_40", 40),
    pin("PIN_GPIO_41", 41),
    pin("PIN_GPIO_42", 42),
    pin("PIN_GPIO_43", 43),
    pin("PIN_GPIO_47", 47),
    pin("PIN_GPIO_48", 48),
    pin("PIN_GPIO_49", 49),
];

// ---------------------------------------------------------------------------
// Analog inputs (ADC channels 0..15)
// ---------------------------------------------------------------------------

pub const ANALOG: &[PinInfo] = &[
    pin("PIN_A0", 54),
    pin("PIN_A1", 55),
    pin("PIN_A2", 56),
    pin("PIN_A3", 57),
    pin("PIN_A4", 58),
    pin("PIN_A5", 59),
    pin("PIN_A6", 60),
    pin("PIN_A7", 61),
    pin("PIN_A8", 62),
    pin("PIN_A9", 63),
    pin("PIN_A10", 64),
    pin("PIN_A11", 65),
    pin("PIN_A12", 66),
    pin("PIN_A13", 67),
    pin("PIN_A14", 68),
    pin("PIN_A15", 69),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PinGroup {
    UartRx,
    UartTx,
    Spi,
    I2c,
    Interrupts,
    Pwm,
    Gpio,
    Analog,
}

impl PinGroup {
    pub const ALL: [PinGroup; 8] = [
        PinGroup::UartRx,
        PinGroup::UartTx,
        PinGroup::Spi,
        PinGroup::I2c,
        PinGroup::Interrupts,
        PinGroup::Pwm,
        PinGroup::Gpio,
        PinGroup::Analog,
    ];

    pub fn table(self) -> &'static [PinInfo] {
        match self {
            PinGroup::UartRx => UART_RX,
            PinGroup::UartTx => UART_TX,
            PinGroup::Spi => SPI,
            PinGroup::I2c => I2C,
            PinGroup::Interrupts => INTERRUPTS,
            PinGroup::Pwm => PWM,
            PinGroup::Gpio => GPIO,
            PinGroup::Analog => ANALOG,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PinGroup::UartRx => "UART RX",
            PinGroup::UartTx => "UART TX",
            PinGroup::Spi => "SPI",
            PinGroup::I2c => "I2C",
            PinGroup::Interrupts => "INTERRUPTS",
            PinGroup::Pwm => "PWM",
            PinGroup::Gpio => "GPIO",
            PinGroup::Analog => "ANALOG",
        }
    }
}

pub fn find(group: PinGroup, number: u8) -> Option<&'static PinInfo> {
    group.table().iter().find(|info| info.number == number)
}

/// Whether `number` exists in `group`'s table.
pub fn lookup(group: PinGroup, number: u8) -> bool {
    find(group, number).is_some()
}

pub fn is_pin_in_gpio(number: u8) -> bool {
    lookup(PinGroup::Gpio, number)
}

/// Pin roles of the RFID-RC522 module. The SPI lines are fixed by the
/// hardware block; RST and IRQ are wired to GPIO 24 and 26.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReaderPins {
    pub miso: u8,
    pub mosi: u8,
    pub sck: u8,
    pub ss: u8,
    pub rst: u8,
    pub irq: u8,
}

impl ReaderPins {
    pub const fn mega() -> Self {
        ReaderPins {
            miso: SPI[0].number,
            mosi: SPI[1].number,
            sck: SPI[2].number,
            ss: SPI[3].number,
            rst: GPIO[2].number,
            irq: GPIO[4].number,
        }
    }

    pub fn roles(&self) -> [(&'static str, u8); 6] {
        [
            ("PIN_MISO", self.miso),
            ("PIN_MOSI", self.mosi),
            ("PIN_SCK ", self.sck),
            ("PIN_SS  ", self.ss),
            ("PIN_RST ", self.rst),
            ("PIN_IRQ ", self.irq),
        ]
    }
}

/// GPIO pin driving the red status LED.
pub const LED_RED: u8 = GPIO[1].number;
