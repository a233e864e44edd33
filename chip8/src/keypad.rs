use crate::KEY_COUNT;

/// One of the 16 hexadecimal keys, labelled 0 through F
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key(u8);

impl Key {
    pub fn new(index: u8) -> Option<Self> {
        (index < KEY_COUNT as u8).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

pub struct Keypad {
    keys: [bool; KEY_COUNT],
    /// Bitmask of keys that went from up to down since the last call to `take_press`
    pressed: u16,
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
            pressed: 0,
        }
    }

    pub fn keydown(&mut self, key: Key) {
        let idx = key.0 as usize;
        if !self.keys[idx] {
            self.pressed |= 1 << idx;
        }
        self.keys[idx] = true;
    }

    pub fn keyup(&mut self, key: Key) {
        self.keys[key.0 as usize] = false;
    }

    /// Only the low nibble of `key` is significant
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn is_key_up(&self, key: u8) -> bool {
        !self.is_key_down(key)
    }

    /// Forget press edges observed so far
    pub fn reset_presses(&mut self) {
        self.pressed = 0;
    }

    /// Consume the lowest numbered press edge, if any
    pub fn take_press(&mut self) -> Option<u8> {
        if self.pressed == 0 {
            return None;
        }
        let key = self.pressed.trailing_zeros() as u8;
        self.pressed &= !(1 << key);
        Some(key)
    }
}
