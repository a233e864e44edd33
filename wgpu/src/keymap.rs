use chip8::Key;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Map a physical key onto the hex keypad using the conventional layout
///
/// ```text
/// 1 2 3 4        1 2 3 C
/// Q W E R   ->   4 5 6 D
/// A S D F        7 8 9 E
/// Z X C V        A 0 B F
/// ```
pub fn map_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };

    let index = match code {
        KeyCode::Digit1 => 0x1,
        KeyCode::Digit2 => 0x2,
        KeyCode::Digit3 => 0x3,
        KeyCode::Digit4 => 0xC,
        KeyCode::KeyQ => 0x4,
        KeyCode::KeyW => 0x5,
        KeyCode::KeyE => 0x6,
        KeyCode::KeyR => 0xD,
        KeyCode::KeyA => 0x7,
        KeyCode::KeyS => 0x8,
        KeyCode::KeyD => 0x9,
        KeyCode::KeyF => 0xE,
        KeyCode::KeyZ => 0xA,
        KeyCode::KeyX => 0x0,
        KeyCode::KeyC => 0xB,
        KeyCode::KeyV => 0xF,
        _ => return None,
    };
    Key::new(index)
}

#[cfg(test)]
mod tests {
    use super::map_key;
    use winit::keyboard::{KeyCode, PhysicalKey};

    #[test]
    fn test_map_key() {
        let index = |code| map_key(PhysicalKey::Code(code)).map(|key| key.index());
        assert_eq!(index(KeyCode::Digit4), Some(0xC));
        assert_eq!(index(KeyCode::KeyX), Some(0x0));
        assert_eq!(index(KeyCode::KeyV), Some(0xF));
        assert_eq!(index(KeyCode::KeyP), None);
    }
}
