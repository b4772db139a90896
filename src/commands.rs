// src/commands.rs

// Commands for the MFRC522 (written to CommandReg)
pub const PCD_IDLE: u8 = 0x00;
pub const PCD_MEM: u8 = 0x01;
pub const PCD_CALC_CRC: u8 = 0x03; // CRC calculation command
pub const PCD_TRANSCEIVE: u8 = 0x0C;
pub const PCD_SOFT_RESET: u8 = 0x0F;

// Commands sent to the PICC over the RF field
pub const PICC_CMD_REQA: u8 = 0x26;
pub const PICC_CMD_HLTA: u8 = 0x50;
pub const PICC_CMD_CT: u8 = 0x88; // Cascade tag, first byte of an incomplete UID part
pub const PICC_CMD_SEL_CL1: u8 = 0x93;
pub const PICC_CMD_SEL_CL2: u8 = 0x95;
pub const PICC_CMD_SEL_CL3: u8 = 0x97;

// Second byte of a SEL frame: anticollision (NVB = 2 bytes) or full select (NVB = 7 bytes)
pub const PICC_NVB_ANTICOLL: u8 = 0x20;
pub const PICC_NVB_SELECT: u8 = 0x70;
