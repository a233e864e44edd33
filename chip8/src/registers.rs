use std::ops::{Index, IndexMut};

use crate::{ADDR_MASK, REGISTER_COUNT, ROM_ADDR, STACK_SIZE};

/// Index of the flag register, overwritten as a side effect by carry, borrow, shift and draw operations
pub const VF: u8 = 0xF;

pub struct Registers {
    /// 16 8-bit general-purpose variable registers numbered 0 through F hexadecimal
    v: [u8; REGISTER_COUNT],
    /// The index register is used to point at locations in memory
    pub(crate) i: u16,
    /// The program counter points to the current instruction in memory
    pub(crate) pc: u16,
}

impl Index<u8> for Registers {
    type Output = u8;

    fn index(&self, register: u8) -> &Self::Output {
        &self.v[(register & 0xF) as usize]
    }
}

impl IndexMut<u8> for Registers {
    fn index_mut(&mut self, register: u8) -> &mut Self::Output {
        &mut self.v[(register & 0xF) as usize]
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: ROM_ADDR as u16,
        }
    }

    pub fn set_flag(&mut self, flag: bool) {
        self[VF] = flag as u8;
    }

    pub fn v(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    /// Move the program counter past the next instruction
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
    }
}

/// A stack for 16-bit addresses, which is used to call subroutines/functions and return from them
pub struct Stack {
    entries: [u16; STACK_SIZE],
    /// The number of return addresses currently pushed
    sp: u8,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            entries: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.sp as usize == STACK_SIZE
    }

    /// Push a return address, leaving the stack untouched when it's already full
    pub fn push(&mut self, addr: u16) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries[self.sp as usize] = addr;
        self.sp += 1;
        true
    }

    pub fn pop(&mut self) -> Option<u16> {
        if self.sp == 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.entries[self.sp as usize])
    }

    pub fn depth(&self) -> u8 {
        self.sp
    }

    pub fn clear(&mut self) {
        self.entries.fill(0);
        self.sp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{Registers, Stack, STACK_SIZE, VF};

    #[test]
    fn test_register_index() {
        let mut registers = Registers::new();
        registers[0x3] = 0x42;
        assert_eq!(registers[0x3], 0x42);
        assert_eq!(registers[0x13], 0x42);

        registers.set_flag(true);
        assert_eq!(registers[VF], 1);
        registers.set_flag(false);
        assert_eq!(registers[VF], 0);
        assert_eq!(registers.pc, 0x200);
    }

    #[test]
    fn test_stack() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), None);

        for addr in 0..STACK_SIZE as u16 {
            assert!(stack.push(0x200 + addr * 2));
        }
        assert!(stack.is_full());
        assert_eq!(stack.push(0x300), false);
        assert_eq!(stack.depth(), STACK_SIZE as u8);

        assert_eq!(stack.pop(), Some(0x200 + (STACK_SIZE as u16 - 1) * 2));
        assert_eq!(stack.depth(), STACK_SIZE as u8 - 1);

        stack.clear();
        assert_eq!(stack.pop(), None);
    }
}
