mod display;
mod error;
mod keypad;
mod memory;
mod opcode;
mod registers;
mod timer;

use std::path::Path;

use log::{debug, error, trace, warn};
use rand::Rng;

use crate::display::Display;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::opcode::{Instruction, Opcode};
use crate::registers::{Registers, Stack, VF};
use crate::timer::Timers;

pub use crate::display::FrameBuffer;
pub use crate::error::{Error, Result};
pub use crate::keypad::Key;

pub const FONT_CHAR_LENGTH: usize = 5;

pub const FONT_DATA: [u8; FONT_CHAR_LENGTH * 0x10] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub const FONT_ADDR: usize = 0x000;

pub const MEM_SIZE: usize = 0x1000;
pub const ADDR_MASK: u16 = (MEM_SIZE - 1) as u16;
pub const ROM_ADDR: usize = 0x200;
pub const MAX_ROM_SIZE: usize = MEM_SIZE - ROM_ADDR;
pub const STACK_SIZE: usize = 0x10;
pub const REGISTER_COUNT: usize = 0x10;
pub const KEY_COUNT: usize = 0x10;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Rate at which the delay and sound timers count down
pub const TIMER_HZ: u32 = 60;

struct Chip8Config {
    legacy_shift: bool,
    jump_add_offset: bool,
    memory_increment_i: bool,
    /// Instructions executed per second of emulated time
    clock_hz: u32,
}

impl Chip8Config {
    pub fn new() -> Self {
        Self {
            legacy_shift: false,
            jump_add_offset: false,
            memory_increment_i: false,
            clock_hz: TIMER_HZ,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Running,
    /// FX0A is suspended until a key press lands in the register
    WaitingForKey(u8),
    Halted,
}

pub struct Chip8 {
    config: Chip8Config,
    mode: Mode,
    /// RAM that stores font data, ROMs, and is fully writeable
    memory: Memory,
    /// A frame buffer containing binary pixel states
    display: Display,
    /// A hexadecimal keypad containing 16 key states labelled 0 through F
    keypad: Keypad,
    stack: Stack,
    registers: Registers,
    timers: Timers,
    /// Set when the sound timer runs out, cleared by `take_beep`
    beep: bool,
    /// Leftover instruction budget carried between frames, in units of 1/TIMER_HZ steps
    frame_acc: u32,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    pub fn new() -> Self {
        let mut memory = Memory::new();
        for (offset, byte) in FONT_DATA.iter().enumerate() {
            memory.write_byte((FONT_ADDR + offset) as u16, *byte);
        }

        Chip8 {
            config: Chip8Config::new(),
            mode: Mode::Running,
            memory,
            display: Display::new(),
            keypad: Keypad::new(),
            stack: Stack::new(),
            registers: Registers::new(),
            timers: Timers::new(),
            beep: false,
            frame_acc: 0,
        }
    }

    /* Config builder functions */
    pub fn legacy_shift(mut self, value: bool) -> Self {
        self.config.legacy_shift = value;
        self
    }

    pub fn jump_add_offset(mut self, value: bool) -> Self {
        self.config.jump_add_offset = value;
        self
    }

    pub fn memory_increment_i(mut self, value: bool) -> Self {
        self.config.memory_increment_i = value;
        self
    }

    pub fn clock_hz(mut self, value: u32) -> Self {
        self.config.clock_hz = value.max(1);
        self
    }

    /// Copy `rom` into the program region and restart execution at its first instruction
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        self.memory.clear_from(ROM_ADDR as u16);
        self.memory.write(ROM_ADDR as u16, rom)?;
        self.registers.pc = ROM_ADDR as u16;
        self.stack.clear();
        self.timers.reset();
        self.keypad.reset_presses();
        self.mode = Mode::Running;
        self.beep = false;
        self.frame_acc = 0;
        debug!("loaded {} byte rom at {:#05x}", rom.len(), ROM_ADDR);
        Ok(())
    }

    pub fn load_rom_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let buf = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_rom(&buf)
    }

    pub fn is_fb_dirty(&self) -> bool {
        self.display.dirty
    }

    /// Take a copy of the frame buffer and clear the dirty flag
    pub fn fb(&mut self) -> FrameBuffer {
        self.display.fb()
    }

    /// Row-major view of the 64x32 pixels, leaving the dirty flag alone
    pub fn pixels(&self) -> &[u8] {
        self.display.pixels()
    }

    pub fn is_sound_playing(&self) -> bool {
        self.timers.st > 0
    }

    /// Returns true once for every time the sound timer has run out since the last call
    pub fn take_beep(&mut self) -> bool {
        std::mem::take(&mut self.beep)
    }

    pub fn keydown(&mut self, key: Key) {
        self.keypad.keydown(key);
    }

    pub fn keyup(&mut self, key: Key) {
        self.keypad.keyup(key);
    }

    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.mode, Mode::WaitingForKey(_))
    }

    pub fn is_halted(&self) -> bool {
        self.mode == Mode::Halted
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn i(&self) -> u16 {
        self.registers.i
    }

    pub fn v(&self) -> &[u8; REGISTER_COUNT] {
        self.registers.v()
    }

    /// Number of return addresses on the call stack
    pub fn sp(&self) -> u8 {
        self.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.st
    }

    /// Run one 60 Hz frame worth of instructions
    ///
    /// Every 60 frames execute exactly `clock_hz` steps, the remainder of a frame's share carries over.
    /// Unknown opcodes are skipped over, the first fatal error stops the frame
    pub fn run_frame(&mut self) -> Result<()> {
        self.frame_acc += self.config.clock_hz;
        let steps = self.frame_acc / TIMER_HZ;
        self.frame_acc %= TIMER_HZ;
        for _ in 0..steps {
            match self.step() {
                Ok(()) => (),
                Err(e) if !e.is_fatal() => (),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Fetch, decode and execute a single instruction, then advance the timers
    pub fn step(&mut self) -> Result<()> {
        match self.mode {
            Mode::Halted => return Err(Error::Halted),
            Mode::WaitingForKey(x) => {
                if let Some(key) = self.keypad.take_press() {
                    debug!("key {:X} pressed, resuming with it in V{:X}", key, x);
                    self.registers[x] = key;
                    self.mode = Mode::Running;
                }
                return Ok(());
            }
            Mode::Running => (),
        }

        let addr = self.registers.pc;
        let opcode = self.fetch();
        let result = match Instruction::decode(opcode) {
            Some(instruction) => {
                trace!("{:#05x} {} {:?}", addr, opcode, instruction);
                self.execute(instruction, addr)
            }
            None => {
                warn!("unknown opcode {} at {:#05x}, skipping", opcode, addr);
                Err(Error::UnknownOpcode {
                    opcode: opcode.raw,
                    addr,
                })
            }
        };

        if let Err(e) = &result {
            if e.is_fatal() {
                error!("halting: {}", e);
                self.mode = Mode::Halted;
            }
            return result;
        }

        if self.mode == Mode::Running && self.timers.advance(self.config.clock_hz) {
            self.beep = true;
        }
        result
    }

    fn fetch(&mut self) -> Opcode {
        let opcode = self.memory.read_word(self.registers.pc);
        self.registers.skip();
        Opcode::from(opcode)
    }

    fn execute(&mut self, instruction: Instruction, addr: u16) -> Result<()> {
        match instruction {
            Instruction::Cls => self.op_cls(),
            Instruction::Return => self.op_sub_return(addr)?,
            Instruction::Jump(nnn) => self.op_jump(nnn),
            Instruction::Call(nnn) => self.op_sub_call(nnn, addr)?,
            Instruction::SkipEq(x, nn) => self.op_skip_eq(x, nn),
            Instruction::SkipNe(x, nn) => self.op_skip_ne(x, nn),
            Instruction::SkipRegEq(x, y) => self.op_skip_reg_eq(x, y),
            Instruction::Set(x, nn) => self.op_set(x, nn),
            Instruction::Add(x, nn) => self.op_add(x, nn),
            Instruction::RegSet(x, y) => self.op_reg_set(x, y),
            Instruction::RegOr(x, y) => self.op_reg_or(x, y),
            Instruction::RegAnd(x, y) => self.op_reg_and(x, y),
            Instruction::RegXor(x, y) => self.op_reg_xor(x, y),
            Instruction::RegAdd(x, y) => self.op_reg_add(x, y),
            Instruction::RegSubRight(x, y) => self.op_reg_sub_right(x, y),
            Instruction::RegShiftRight(x, y) => self.op_reg_shift_right(x, y),
            Instruction::RegSubLeft(x, y) => self.op_reg_sub_left(x, y),
            Instruction::RegShiftLeft(x, y) => self.op_reg_shift_left(x, y),
            Instruction::SkipRegNe(x, y) => self.op_skip_reg_ne(x, y),
            Instruction::SetIndex(nnn) => self.op_set_index(nnn),
            Instruction::JumpWithOffset(nnn, x) => self.op_jump_with_offset(nnn, x),
            Instruction::Random(x, nn) => self.op_random(x, nn),
            Instruction::Draw(x, y, n) => self.op_display(x, y, n),
            Instruction::SkipIfKeyDown(x) => self.op_skip_if_key_down(x),
            Instruction::SkipIfKeyUp(x) => self.op_skip_if_key_up(x),
            Instruction::DelayGet(x) => self.op_dt_get(x),
            Instruction::GetKey(x) => self.op_get_key(x),
            Instruction::DelaySet(x) => self.op_dt_set(x),
            Instruction::SoundSet(x) => self.op_st_set(x),
            Instruction::AddToIndex(x) => self.op_add_to_index(x),
            Instruction::FontCharacter(x) => self.op_font_character(x),
            Instruction::Bcd(x) => self.op_convert_to_decimal(x),
            Instruction::MemoryStore(x) => self.op_memory_store(x),
            Instruction::MemoryLoad(x) => self.op_memory_load(x),
        }
        Ok(())
    }

    /* Operations */

    /// 0x00E0
    fn op_cls(&mut self) {
        self.display.clear();
    }

    /// 0x00EE
    fn op_sub_return(&mut self, addr: u16) -> Result<()> {
        self.registers.pc = self.stack.pop().ok_or(Error::StackUnderflow { addr })?;
        Ok(())
    }

    /// 0x1NNN
    fn op_jump(&mut self, nnn: u16) {
        self.registers.pc = nnn;
    }

    /// 0x2NNN
    fn op_sub_call(&mut self, nnn: u16, addr: u16) -> Result<()> {
        if !self.stack.push(self.registers.pc) {
            return Err(Error::StackOverflow { addr });
        }
        self.registers.pc = nnn;
        Ok(())
    }

    /// 0x3XNN
    fn op_skip_eq(&mut self, x: u8, nn: u8) {
        if self.registers[x] == nn {
            self.registers.skip();
        }
    }

    /// 0x4XNN
    fn op_skip_ne(&mut self, x: u8, nn: u8) {
        if self.registers[x] != nn {
            self.registers.skip();
        }
    }

    /// 0x5XY0
    fn op_skip_reg_eq(&mut self, x: u8, y: u8) {
        if self.registers[x] == self.registers[y] {
            self.registers.skip();
        }
    }

    /// 0x6XNN
    fn op_set(&mut self, x: u8, nn: u8) {
        self.registers[x] = nn;
    }

    /// 0x7XNN
    fn op_add(&mut self, x: u8, nn: u8) {
        self.registers[x] = self.registers[x].wrapping_add(nn);
    }

    /// 0x8XY0
    fn op_reg_set(&mut self, x: u8, y: u8) {
        self.registers[x] = self.registers[y];
    }

    /// 0x8XY1
    fn op_reg_or(&mut self, x: u8, y: u8) {
        self.registers[x] |= self.registers[y];
    }

    /// 0x8XY2
    fn op_reg_and(&mut self, x: u8, y: u8) {
        self.registers[x] &= self.registers[y];
    }

    /// 0x8XY3
    fn op_reg_xor(&mut self, x: u8, y: u8) {
        self.registers[x] ^= self.registers[y];
    }

    /// 0x8XY4
    fn op_reg_add(&mut self, x: u8, y: u8) {
        let (sum, overflow) = self.registers[x].overflowing_add(self.registers[y]);
        self.registers[x] = sum;
        self.registers.set_flag(overflow);
    }

    /// 0x8XY5
    fn op_reg_sub_right(&mut self, x: u8, y: u8) {
        let (diff, borrow) = self.registers[x].overflowing_sub(self.registers[y]);
        self.registers[x] = diff;
        self.registers.set_flag(!borrow);
    }

    /// 0x8XY6
    fn op_reg_shift_right(&mut self, x: u8, y: u8) {
        if self.config.legacy_shift {
            self.registers[x] = self.registers[y];
        }
        let flag = self.registers[x] & 0x1;
        self.registers[x] >>= 1;
        self.registers[VF] = flag;
    }

    /// 0x8XY7
    fn op_reg_sub_left(&mut self, x: u8, y: u8) {
        let (diff, borrow) = self.registers[y].overflowing_sub(self.registers[x]);
        self.registers[x] = diff;
        self.registers.set_flag(!borrow);
    }

    /// 0x8XYE
    fn op_reg_shift_left(&mut self, x: u8, y: u8) {
        if self.config.legacy_shift {
            self.registers[x] = self.registers[y];
        }
        let flag = self.registers[x] >> 7 & 0x1;
        self.registers[x] <<= 1;
        self.registers[VF] = flag;
    }

    /// 0x9XY0
    fn op_skip_reg_ne(&mut self, x: u8, y: u8) {
        if self.registers[x] != self.registers[y] {
            self.registers.skip();
        }
    }

    /// 0xANNN
    fn op_set_index(&mut self, nnn: u16) {
        self.registers.i = nnn;
    }

    /// 0xBNNN
    fn op_jump_with_offset(&mut self, nnn: u16, x: u8) {
        let idx = if self.config.jump_add_offset { x } else { 0 };
        self.registers.pc = Memory::wrap(nnn + self.registers[idx] as u16);
    }

    /// 0xCXNN
    fn op_random(&mut self, x: u8, nn: u8) {
        self.registers[x] = nn & rand::rng().random::<u8>();
    }

    /// 0xDXYN
    fn op_display(&mut self, x: u8, y: u8, n: u8) {
        let vx = self.registers[x] as usize;
        let vy = self.registers[y] as usize;
        let i = self.registers.i;

        let mut collision = false;
        for row in 0..n {
            let byte = self.memory.read(i.wrapping_add(row as u16));
            collision |= self.display.draw_row(vx, vy + row as usize, byte);
        }
        self.registers.set_flag(collision);
    }

    /// 0xEX9E
    fn op_skip_if_key_down(&mut self, x: u8) {
        if self.keypad.is_key_down(self.registers[x]) {
            self.registers.skip();
        }
    }

    /// 0xEXA1
    fn op_skip_if_key_up(&mut self, x: u8) {
        if self.keypad.is_key_up(self.registers[x]) {
            self.registers.skip();
        }
    }

    /// 0xFX07
    fn op_dt_get(&mut self, x: u8) {
        self.registers[x] = self.timers.dt;
    }

    /// 0xFX0A
    fn op_get_key(&mut self, x: u8) {
        debug!("waiting for key press into V{:X}", x);
        self.keypad.reset_presses();
        self.mode = Mode::WaitingForKey(x);
    }

    /// 0xFX15
    fn op_dt_set(&mut self, x: u8) {
        self.timers.dt = self.registers[x];
    }

    /// 0xFX18
    fn op_st_set(&mut self, x: u8) {
        self.timers.st = self.registers[x];
    }

    /// 0xFX1E
    fn op_add_to_index(&mut self, x: u8) {
        self.registers.i = Memory::wrap(self.registers.i.wrapping_add(self.registers[x] as u16));
    }

    /// 0xFX29
    fn op_font_character(&mut self, x: u8) {
        let digit = (self.registers[x] & 0xF) as usize;
        self.registers.i = (FONT_ADDR + FONT_CHAR_LENGTH * digit) as u16;
    }

    /// 0xFX33
    fn op_convert_to_decimal(&mut self, x: u8) {
        let n = self.registers[x];
        let i = self.registers.i;
        self.memory.write_byte(i, n / 100);
        self.memory.write_byte(i.wrapping_add(1), n / 10 % 10);
        self.memory.write_byte(i.wrapping_add(2), n % 10);
    }

    /// 0xFX55
    fn op_memory_store(&mut self, x: u8) {
        let start = self.registers.i;
        for r in 0..=x {
            self.memory
                .write_byte(start.wrapping_add(r as u16), self.registers[r]);
        }
        if self.config.memory_increment_i {
            self.registers.i = Memory::wrap(start + x as u16 + 1);
        }
    }

    /// 0xFX65
    fn op_memory_load(&mut self, x: u8) {
        let start = self.registers.i;
        for r in 0..=x {
            self.registers[r] = self.memory.read(start.wrapping_add(r as u16));
        }
        if self.config.memory_increment_i {
            self.registers.i = Memory::wrap(start + x as u16 + 1);
        }
    }
}
