//! Physical keyboard to hex keypad mapping.
//!
//! The layout is fixed: the digit and `A`-`F` keys map to their own hex
//! value, and the space bar plus arrow keys alias onto the numeric keys
//! games use for movement (`Space` = 5, `Left` = 4, `Right` = 6, `Down` = 2,
//! `Up` = 8).

use std::collections::HashSet;

use crate::core::KeyCode;

/// Platform-neutral identifier for a key on the host keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalKey {
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    A,
    B,
    C,
    D,
    E,
    F,
    Space,
    Left,
    Right,
    Up,
    Down,
    /// Any other key, carrying the platform's raw code.
    Other(i32),
}

/// Map a physical key to the keypad key it drives, if any.
pub fn translate(key: PhysicalKey) -> Option<KeyCode> {
    let value = match key {
        PhysicalKey::Num0 => 0x0,
        PhysicalKey::Num1 => 0x1,
        PhysicalKey::Num2 | PhysicalKey::Down => 0x2,
        PhysicalKey::Num3 => 0x3,
        PhysicalKey::Num4 | PhysicalKey::Left => 0x4,
        PhysicalKey::Num5 | PhysicalKey::Space => 0x5,
        PhysicalKey::Num6 | PhysicalKey::Right => 0x6,
        PhysicalKey::Num7 => 0x7,
        PhysicalKey::Num8 | PhysicalKey::Up => 0x8,
        PhysicalKey::Num9 => 0x9,
        PhysicalKey::A => 0xA,
        PhysicalKey::B => 0xB,
        PhysicalKey::C => 0xC,
        PhysicalKey::D => 0xD,
        PhysicalKey::E => 0xE,
        PhysicalKey::F => 0xF,
        PhysicalKey::Other(_) => return None,
    };
    KeyCode::new(value)
}

/// Tracks which mapped physical keys are down so that aliased keys combine
/// with a logical OR.
///
/// A keypad key reads as pressed while any physical key mapped to it is held.
/// `press` and `release` return the keypad key only when its logical state
/// actually changes, which also swallows auto-repeat key-downs.
#[derive(Default)]
pub struct KeyLatch {
    held: HashSet<PhysicalKey>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns the keypad key if it just became pressed.
    pub fn press(&mut self, key: PhysicalKey) -> Option<KeyCode> {
        let code = translate(key)?;
        if !self.held.insert(key) {
            return None;
        }
        (!self.held_by_other(key, code)).then_some(code)
    }

    /// Record a key-up. Returns the keypad key if it just became released.
    pub fn release(&mut self, key: PhysicalKey) -> Option<KeyCode> {
        let code = translate(key)?;
        if !self.held.remove(&key) {
            return None;
        }
        (!self.held_by_other(key, code)).then_some(code)
    }

    /// True while any physical key mapped to `code` is held.
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.held.iter().any(|&k| translate(k) == Some(code))
    }

    fn held_by_other(&self, key: PhysicalKey, code: KeyCode) -> bool {
        self.held
            .iter()
            .any(|&other| other != key && translate(other) == Some(code))
    }
}
