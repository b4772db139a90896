use ufmt::{uDisplay, uWrite, Formatter};

use crate::log::Hex;

/// Longest UID a PICC can announce (triple size).
pub const MAX_UID_LEN: usize = 10;

/// UID read during one detection cycle, with the SAK from the final select.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Uid {
    bytes: [u8; MAX_UID_LEN],
    len: u8,
    sak: u8,
}

impl Uid {
    pub const fn empty() -> Self {
        Uid {
            bytes: [0; MAX_UID_LEN],
            len: 0,
            sak: 0,
        }
    }

    /// Builds a UID from raw bytes, keeping at most `MAX_UID_LEN` of them.
    pub fn from_bytes(bytes: &[u8], sak: u8) -> Self {
        let mut uid = Uid::empty();
        uid.extend(bytes);
        uid.sak = sak;
        uid
    }

    pub(crate) fn extend(&mut self, part: &[u8]) {
        for &byte in part {
            if self.len as usize == MAX_UID_LEN {
                break;
            }
            self.bytes[self.len as usize] = byte;
            self.len += 1;
        }
    }

    pub(crate) fn set_sak(&mut self, sak: u8) {
        self.sak = sak;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn sak(&self) -> u8 {
        self.sak
    }
}

/// Colon-separated uppercase hex pairs, e.g. `04:A3:5B:2C`.
impl uDisplay for Uid {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for (i, &byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            uDisplay::fmt(&Hex(byte), f)?;
        }
        Ok(())
    }
}
