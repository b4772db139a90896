// Register addresses are pre-shifted into the SPI address byte position.

// Command and status
pub const COMMAND_REG: u8 = 0x01 << 1;
pub const COM_IRQ_REG: u8 = 0x04 << 1;         // Interrupt request bits
pub const DIV_IRQ_REG: u8 = 0x05 << 1;         // Set bits to signal internal events
pub const ERROR_REG: u8 = 0x06 << 1;           // Error bits showing the error status of the last command
pub const STATUS2_REG: u8 = 0x08 << 1;         // Receiver and transmitter status bits
pub const FIFO_DATA_REG: u8 = 0x09 << 1;       // FIFO data input/output
pub const FIFO_LEVEL_REG: u8 = 0x0A << 1;      // Number of bytes in the FIFO buffer
pub const CONTROL_REG: u8 = 0x0C << 1;         // Miscellaneous control bits
pub const BIT_FRAMING_REG: u8 = 0x0D << 1;     // Adjustments for bit-oriented frames
pub const COLL_REG: u8 = 0x0E << 1;            // Collision detection

// Communication
pub const MODE_REG: u8 = 0x11 << 1;            // Defines general modes for transmitting and receiving
pub const TX_MODE_REG: u8 = 0x12 << 1;         // Defines transmission data rate and framing
pub const RX_MODE_REG: u8 = 0x13 << 1;         // Defines reception data rate and framing
pub const TX_CONTROL_REG: u8 = 0x14 << 1;      // Logical behavior of the antenna driver pins TX1 and TX2
pub const TX_ASK_REG: u8 = 0x15 << 1;          // Transmission modulation setting

// Configuration
pub const CRC_RESULT_REG_H: u8 = 0x21 << 1;    // CRC calculation result, MSB
pub const CRC_RESULT_REG_L: u8 = 0x22 << 1;    // CRC calculation result, LSB
pub const MOD_WIDTH_REG: u8 = 0x24 << 1;       // Modulation width setting
pub const T_MODE_REG: u8 = 0x2A << 1;          // Timer settings
pub const T_PRESCALER_REG: u8 = 0x2B << 1;     // Timer prescaler value
pub const T_RELOAD_REG_H: u8 = 0x2C << 1;      // 16-bit timer reload value, high byte
pub const T_RELOAD_REG_L: u8 = 0x2D << 1;      // 16-bit timer reload value, low byte

// Test
pub const AUTO_TEST_REG: u8 = 0x36 << 1;       // Controls the digital self-test
pub const VERSION_REG: u8 = 0x37 << 1;         // Shows the software version

// ComIrqReg bits
pub const IRQ_TIMER: u8 = 0x01;
pub const IRQ_RX: u8 = 0x20;
pub const IRQ_IDLE: u8 = 0x10;

// ErrorReg bits
pub const ERR_COLL: u8 = 0x08;
pub const ERR_FATAL: u8 = 0x13; // BufferOvfl | ParityErr | ProtocolErr

// DivIrqReg bits
pub const DIV_IRQ_CRC: u8 = 0x04;

// TxControlReg bits driving TX1 and TX2
pub const TX_CONTROL_ANTENNA: u8 = 0x03;

// Status2Reg bit for MIFARE Crypto1
pub const STATUS2_CRYPTO1_ON: u8 = 0x08;

// CommandReg power-down bit, cleared once the chip has finished a soft reset
pub const COMMAND_POWER_DOWN: u8 = 0x10;

// BitFramingReg start-send bit
pub const BIT_FRAMING_START_SEND: u8 = 0x80;

// CollReg ValuesAfterColl bit
pub const COLL_VALUES_AFTER_COLL: u8 = 0x80;
