use bitflags::*;

use crate::hardware::ppu::Mode;

bitflags! {
    /// FF40: every bit changes rendering behaviour and may be rewritten at
    /// any point during the frame.
    #[derive(Default)]
    pub struct LcdControl: u8 {
        /// When clear, background and window render as colour 0.
        const BG_WINDOW_ENABLE = 0b0000_0001;
        /// Sprite rendering on/off.
        const OBJ_ENABLE = 0b0000_0010;
        /// 0 = 8x8 sprites, 1 = 8x16 sprites.
        const OBJ_SIZE = 0b0000_0100;
        /// 0 = background tilemap at 0x9800, 1 = 0x9C00.
        const BG_TILEMAP = 0b0000_1000;
        /// 0 = signed tile indices based at 0x9000, 1 = unsigned at 0x8000.
        const BG_WINDOW_TILE_ADDR = 0b0001_0000;
        /// Window rendering on/off.
        const WINDOW_ENABLE = 0b0010_0000;
        /// 0 = window tilemap at 0x9800, 1 = 0x9C00.
        const WINDOW_TILEMAP = 0b0100_0000;
        /// LCD and PPU master enable. Clearing it resets the PPU and leaves
        /// VRAM/OAM freely accessible.
        const PPU_ENABLE = 0b1000_0000;
    }
}

bitflags! {
    /// FF41: mode/compare status in the read-only low bits, interrupt source
    /// selects in the writable high bits.
    #[derive(Default)]
    pub struct LcdStatus: u8 {
        /// Low bit of the current mode.
        const MODE_BIT_0 = 0b0000_0001;
        /// High bit of the current mode.
        const MODE_BIT_1 = 0b0000_0010;
        /// Latched on every LY assignment.
        const LYC_EQUALS_LY = 0b0000_0100;
        const MODE_0_SELECT = 0b0000_1000;
        const MODE_1_SELECT = 0b0001_0000;
        const MODE_2_SELECT = 0b0010_0000;
        const LYC_SELECT = 0b0100_0000;
        const UNUSED = 0b1000_0000;
    }
}

impl LcdStatus {
    pub fn mode(&self) -> Mode {
        match self.bits() & 0x3 {
            0 => Mode::HBlank,
            1 => Mode::VBlank,
            2 => Mode::OamScan,
            _ => Mode::Drawing,
        }
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        LcdStatus::from_bits_truncate((self.bits() & !0x3) | mode as u8)
    }
}

bitflags! {
    /// The attribute byte of an OAM entry.
    #[derive(Default)]
    pub struct AttributeFlags: u8 {
        /// CGB palette number placeholder.
        const PALETTE_NUMBER_CGB = 0b0000_0111;
        /// CGB VRAM bank placeholder.
        const TILE_VRAM_BANK = 0b0000_1000;
        /// 0 = OBP0, 1 = OBP1.
        const PALETTE_NUMBER = 0b0001_0000;
        const X_FLIP = 0b0010_0000;
        const Y_FLIP = 0b0100_0000;
        /// When set the sprite only shows over background colour 0.
        const OBJ_TO_BG_PRIORITY = 0b1000_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for &mode in &[Mode::HBlank, Mode::VBlank, Mode::OamScan, Mode::Drawing] {
            let status = LcdStatus::from_bits_truncate(0x78).with_mode(mode);
            assert_eq!(status.mode(), mode);
            // Select bits survive mode changes.
            assert_eq!(status.bits() & 0x78, 0x78);
        }
    }
}
