//! The joypad port. The guest selects one of two key rows by writing the
//! upper select bits of P1; reads return the selected row's keys active-low.
//! The frontend hands us a plain snapshot of all eight keys once per frame.

use bitflags::*;

pub const JOYPAD_REGISTER: u16 = 0xFF00;

/// The state of all eight keys, sampled by the frontend. `true` is pressed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct JoypadState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub start: bool,
    pub select: bool,
}

bitflags! {
    /// Active-high key bits within one selected row.
    #[derive(Default)]
    struct KeyRow: u8 {
        /// Right or A
        const RIGHT_A    = 0b0000_0001;
        /// Left or B
        const LEFT_B     = 0b0000_0010;
        /// Up or Select
        const UP_SELECT  = 0b0000_0100;
        /// Down or Start
        const DOWN_START = 0b0000_1000;
    }
}

#[derive(Debug, Default)]
pub struct JoyPad {
    directions: KeyRow,
    buttons: KeyRow,
    /// Bits 4..5 of the last P1 write, active-low row selects.
    select: u8,
}

impl JoyPad {
    pub fn new() -> Self {
        JoyPad {
            directions: KeyRow::empty(),
            buttons: KeyRow::empty(),
            select: 0x30,
        }
    }

    /// Latch a fresh input snapshot; called once per frame.
    pub fn latch(&mut self, state: &JoypadState) {
        self.directions = KeyRow::empty();
        self.directions.set(KeyRow::RIGHT_A, state.right);
        self.directions.set(KeyRow::LEFT_B, state.left);
        self.directions.set(KeyRow::UP_SELECT, state.up);
        self.directions.set(KeyRow::DOWN_START, state.down);

        self.buttons = KeyRow::empty();
        self.buttons.set(KeyRow::RIGHT_A, state.a);
        self.buttons.set(KeyRow::LEFT_B, state.b);
        self.buttons.set(KeyRow::UP_SELECT, state.select);
        self.buttons.set(KeyRow::DOWN_START, state.start);
    }

    /// Store the row select bits; anything written to the key bits is
    /// discarded.
    pub fn write_register(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// The current P1 value: select bits as written, keys active-low for
    /// every selected row.
    pub fn read_register(&self) -> u8 {
        let mut keys = 0x0F;
        if self.select & 0x10 == 0 {
            keys &= !self.directions.bits();
        }
        if self.select & 0x20 == 0 {
            keys &= !self.buttons.bits();
        }

        0xC0 | self.select | (keys & 0x0F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_row_selected_reads_released() {
        let mut joypad = JoyPad::new();
        joypad.latch(&JoypadState {
            a: true,
            down: true,
            ..Default::default()
        });

        assert_eq!(joypad.read_register() & 0x0F, 0x0F);
    }

    #[test]
    fn test_direction_row() {
        let mut joypad = JoyPad::new();
        joypad.latch(&JoypadState {
            down: true,
            right: true,
            ..Default::default()
        });

        joypad.write_register(0x20);
        // DOWN (bit 3) and RIGHT (bit 0) read low.
        assert_eq!(joypad.read_register() & 0x0F, 0b0110);
    }

    #[test]
    fn test_button_row() {
        let mut joypad = JoyPad::new();
        joypad.latch(&JoypadState {
            a: true,
            start: true,
            ..Default::default()
        });

        joypad.write_register(0x10);
        // A (bit 0) and START (bit 3) read low.
        assert_eq!(joypad.read_register() & 0x0F, 0b0110);
    }

    #[test]
    fn test_key_bit_writes_are_discarded() {
        let mut joypad = JoyPad::new();
        joypad.write_register(0x2F);

        assert_eq!(joypad.read_register(), 0xC0 | 0x20 | 0x0F);
    }
}
