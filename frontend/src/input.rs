use chipbox_core::keypad::PhysicalKey;
use sdl2::keyboard::Scancode;

/// Translate an SDL scancode into the host's physical key identity.
///
/// Scancodes follow the key's position rather than the active layout, so
/// the keypad stays put on non-QWERTY keyboards.
pub fn physical_key(scancode: Scancode) -> PhysicalKey {
    match scancode {
        Scancode::Num0 => PhysicalKey::Num0,
        Scancode::Num1 => PhysicalKey::Num1,
        Scancode::Num2 => PhysicalKey::Num2,
        Scancode::Num3 => PhysicalKey::Num3,
        Scancode::Num4 => PhysicalKey::Num4,
        Scancode::Num5 => PhysicalKey::Num5,
        Scancode::Num6 => PhysicalKey::Num6,
        Scancode::Num7 => PhysicalKey::Num7,
        Scancode::Num8 => PhysicalKey::Num8,
        Scancode::Num9 => PhysicalKey::Num9,
        Scancode::A => PhysicalKey::A,
        Scancode::B => PhysicalKey::B,
        Scancode::C => PhysicalKey::C,
        Scancode::D => PhysicalKey::D,
        Scancode::E => PhysicalKey::E,
        Scancode::F => PhysicalKey::F,
        Scancode::Space => PhysicalKey::Space,
        Scancode::Left => PhysicalKey::Left,
        Scancode::Right => PhysicalKey::Right,
        Scancode::Up => PhysicalKey::Up,
        Scancode::Down => PhysicalKey::Down,
        other => PhysicalKey::Other(other as i32),
    }
}
