use crate::error::{Error, Result};
use crate::{ADDR_MASK, MEM_SIZE};

pub struct Memory {
    data: [u8; MEM_SIZE],
}

impl Memory {
    /// Create an empty instance of the Memory struct
    pub fn new() -> Self {
        Self {
            data: [0; MEM_SIZE],
        }
    }

    /// Reduce any computed address into the 12-bit address space
    pub fn wrap(addr: u16) -> u16 {
        addr & ADDR_MASK
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.data[Self::wrap(addr) as usize]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.data[Self::wrap(addr) as usize] = value;
    }

    /// Read the big-endian instruction word at `addr`
    pub fn read_word(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    /// Write `data` into memory starting at `addr` and return the number of bytes written
    ///
    /// Unlike single byte accesses this does not wrap, a slice that doesn't fit is rejected
    pub fn write(&mut self, addr: u16, data: &[u8]) -> Result<usize> {
        let start = addr as usize;
        if start >= MEM_SIZE || MEM_SIZE - start < data.len() {
            return Err(Error::MemoryOutOfRange {
                addr,
                len: data.len(),
            });
        }

        self.data[start..start + data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    /// Zero everything from `addr` to the end of memory
    pub fn clear_from(&mut self, addr: u16) {
        let start = Self::wrap(addr) as usize;
        self.data[start..].fill(0);
    }

    #[cfg(test)]
    pub fn slice(&self, addr: usize, len: usize) -> &[u8] {
        &self.data[addr..addr + len]
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, MEM_SIZE};
    use crate::error::Error;

    #[test]
    fn test_wrapping_access() {
        let mut memory = Memory::new();
        memory.write_byte(0x1000, 0xAB);
        assert_eq!(memory.read(0x000), 0xAB);
        memory.write_byte(0xFFF, 0x12);
        assert_eq!(memory.read_word(0xFFF), 0x12AB);
    }

    #[test]
    fn test_write() {
        let mut memory = Memory::new();
        assert_eq!(memory.write(0x200, &[1, 2, 3]).unwrap(), 3);
        assert_eq!(memory.slice(0x200, 3), [1, 2, 3]);

        assert_eq!(memory.write((MEM_SIZE - 2) as u16, &[1, 2]).unwrap(), 2);
        assert!(matches!(
            memory.write((MEM_SIZE - 2) as u16, &[1, 2, 3]),
            Err(Error::MemoryOutOfRange { len: 3, .. })
        ));
        assert!(memory.write(MEM_SIZE as u16, &[]).is_err());
    }

    #[test]
    fn test_clear_from() {
        let mut memory = Memory::new();
        memory.write(0x1FF, &[7, 7, 7]).unwrap();
        memory.clear_from(0x200);
        assert_eq!(memory.slice(0x1FF, 3), [7, 0, 0]);
    }
}
