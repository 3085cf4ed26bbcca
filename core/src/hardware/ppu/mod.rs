//! The pixel processing unit: a dot-clocked mode state machine over 456-dot
//! scanlines, a per-scanline compositor working from pre-composited 256x256
//! background/window index buffers, and the STAT interrupt edge detector.

use itertools::Itertools;
use log::*;
use tinyvec::ArrayVec;

use crate::hardware::ppu::palette::{Palette, DISPLAY_PALETTE};
use crate::hardware::ppu::register_flags::{AttributeFlags, LcdControl, LcdStatus};
use crate::hardware::ppu::tiledata::*;
use crate::io::interrupts::Interrupt;
use crate::io::io_registers::{IoRegisters, INVALID_READ};
use crate::support::AddressRange;

pub mod palette;
pub mod register_flags;
pub mod tiledata;

pub const RESOLUTION_WIDTH: usize = 160;
pub const RESOLUTION_HEIGHT: usize = 144;
/// RGBA8 bytes per pixel.
pub const RGBA_CHANNELS: usize = 4;
pub const FRAMEBUFFER_SIZE: usize = RESOLUTION_WIDTH * RESOLUTION_HEIGHT * RGBA_CHANNELS;

/// The background and window layers are composed on a 256x256 canvas.
pub const BG_DIM: usize = 256;

pub const VRAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xA0;
pub const OAM_SPRITE_COUNT: usize = 40;
/// At most this many sprites are selected per scanline, in OAM order.
pub const MAX_SPRITES_PER_LINE: usize = 10;

pub const VRAM_ADDR_RANGE: AddressRange = AddressRange::new(0x8000, 0xA000);
pub const OAM_ADDR_RANGE: AddressRange = AddressRange::new(0xFE00, 0xFEA0);

/// A scanline is 456 dots: 80 of OAM scan, 120 of drawing, the rest HBlank.
pub const DOTS_PER_LINE: u16 = 456;
pub const OAM_SCAN_DOTS: u16 = 80;
pub const DRAWING_END_DOT: u16 = 280;
/// Scanlines 144..=153 are VBlank.
pub const VBLANK_START_LINE: u8 = 144;
pub const LINES_PER_FRAME: u8 = 154;

pub const LCD_CONTROL_REGISTER: u16 = 0xFF40;
pub const LCD_STATUS_REGISTER: u16 = 0xFF41;
/// Background scroll, wrapping over the 256x256 canvas.
pub const SCY_REGISTER: u16 = 0xFF42;
pub const SCX_REGISTER: u16 = 0xFF43;
/// The scanline currently being processed, 0..=153. Read only.
pub const LY_REGISTER: u16 = 0xFF44;
/// Compared against LY on every LY assignment; equality latches STAT bit 2.
pub const LYC_REGISTER: u16 = 0xFF45;
/// Writing starts a 160 byte OAM copy from `value << 8`.
pub const DMA_TRANSFER: u16 = 0xFF46;
pub const BG_PALETTE: u16 = 0xFF47;
pub const OB_PALETTE_0: u16 = 0xFF48;
pub const OB_PALETTE_1: u16 = 0xFF49;
/// Window origin; the window is visible from `(WX - 7, WY)` onwards.
pub const WY_REGISTER: u16 = 0xFF4A;
pub const WX_REGISTER: u16 = 0xFF4B;

/// PPU modes as encoded in STAT bits 0..1.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

/// The four STAT interrupt sources feeding the shared interrupt line.
#[derive(Debug, Copy, Clone)]
enum StatSource {
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
    LyLyc = 3,
}

/// One OAM entry. The raw x/y bytes are offset by 8 and 16 respectively.
#[derive(Debug, Default, Copy, Clone)]
pub struct SpriteAttribute {
    pub y_pos: u8,
    pub x_pos: u8,
    pub tile_number: u8,
    pub flags: AttributeFlags,
}

pub struct Ppu {
    vram: [u8; VRAM_SIZE],
    oam: [u8; OAM_SIZE],
    framebuffer: Vec<u8>,
    bg_indices: Vec<u8>,
    window_indices: Vec<u8>,
    /// Dot position within the current scanline, in [0, 456).
    dot: u16,
    /// Re-derived every tick; indexed by `StatSource`.
    stat_sources: [bool; 4],
    /// Previous OR of the sources, for rising edge detection.
    stat_irq_level: bool,
    /// When set (the default), disabling the background forces the window to
    /// background colour 0 as well.
    force_window_color_zero: bool,
}

impl Ppu {
    pub fn new(force_window_color_zero: bool) -> Self {
        Ppu {
            vram: [0; VRAM_SIZE],
            oam: [0; OAM_SIZE],
            framebuffer: vec![0; FRAMEBUFFER_SIZE],
            bg_indices: vec![0; BG_DIM * BG_DIM],
            window_indices: vec![0; BG_DIM * BG_DIM],
            dot: 0,
            stat_sources: [false; 4],
            stat_irq_level: false,
            force_window_color_zero,
        }
    }

    /// The 160x144 RGBA8 output, row major from the top left.
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Advance the PPU by one dot. Mode transitions and LY updates happen at
    /// fixed dot counts; the STAT line is re-derived from scratch afterwards
    /// and only its rising edge requests the LCD interrupt.
    pub fn tick(&mut self, io: &mut IoRegisters) {
        if !self.lcd_control(io).contains(LcdControl::PPU_ENABLE) {
            return;
        }

        self.stat_sources = [false; 4];
        self.dot += 1;

        match self.lcd_status(io).mode() {
            Mode::OamScan => {
                if self.dot == OAM_SCAN_DOTS {
                    self.set_mode(io, Mode::Drawing);
                    self.render_scanline(io);
                }
            }
            Mode::Drawing => {
                if self.dot == DRAWING_END_DOT {
                    self.set_mode(io, Mode::HBlank);
                }
            }
            Mode::HBlank => {
                if self.dot == DOTS_PER_LINE {
                    self.dot = 0;
                    let line = io.read_byte(LY_REGISTER) + 1;
                    self.set_ly(io, line);

                    if line == VBLANK_START_LINE {
                        self.set_mode(io, Mode::VBlank);
                        io.request_interrupt(Interrupt::VBlank);
                    } else {
                        self.set_mode(io, Mode::OamScan);
                    }
                }
            }
            Mode::VBlank => {
                if self.dot == DOTS_PER_LINE {
                    self.dot = 0;
                    let mut line = io.read_byte(LY_REGISTER) + 1;
                    if line == LINES_PER_FRAME {
                        line = 0;
                        self.set_mode(io, Mode::OamScan);
                    }
                    self.set_ly(io, line);
                }
            }
        }

        self.update_stat_line(io);
    }

    /// Reset to the top of the frame; used when LCDC bit 7 is cleared.
    pub fn reset(&mut self, io: &mut IoRegisters) {
        self.dot = 0;
        self.set_ly(io, 0);
        self.set_mode(io, Mode::OamScan);
        self.stat_sources = [false; 4];
        self.stat_irq_level = false;
    }

    /// CPU-facing VRAM read; returns 0xFF while the PPU is drawing.
    pub fn read_vram(&self, address: u16, io: &IoRegisters) -> u8 {
        if !self.vram_accessible(io) {
            warn!("CPU read of locked VRAM at {:#06X}", address);
            return INVALID_READ;
        }
        self.vram[VRAM_ADDR_RANGE.offset(address)]
    }

    pub fn write_vram(&mut self, address: u16, value: u8, io: &IoRegisters) {
        if !self.vram_accessible(io) {
            warn!("CPU write to locked VRAM at {:#06X}", address);
            return;
        }
        self.vram[VRAM_ADDR_RANGE.offset(address)] = value;
    }

    /// CPU-facing OAM read; locked during OAM scan and drawing.
    pub fn read_oam(&self, address: u16, io: &IoRegisters) -> u8 {
        if !self.oam_accessible(io) {
            warn!("CPU read of locked OAM at {:#06X}", address);
            return INVALID_READ;
        }
        self.oam[OAM_ADDR_RANGE.offset(address)]
    }

    pub fn write_oam(&mut self, address: u16, value: u8, io: &IoRegisters) {
        if !self.oam_accessible(io) {
            warn!("CPU write to locked OAM at {:#06X}", address);
            return;
        }
        self.oam[OAM_ADDR_RANGE.offset(address)] = value;
    }

    /// OAM write used by the DMA engine; ignores the CPU lockout.
    pub fn write_oam_dma(&mut self, index: u8, value: u8) {
        self.oam[index as usize] = value;
    }

    /// LYC writes re-run the comparison immediately.
    pub fn write_lyc(&mut self, io: &mut IoRegisters, value: u8) {
        io.write_byte(LYC_REGISTER, value);
        let line = io.read_byte(LY_REGISTER);
        self.compare_line(io, line);
    }

    fn lcd_control(&self, io: &IoRegisters) -> LcdControl {
        LcdControl::from_bits_truncate(io.read_byte(LCD_CONTROL_REGISTER))
    }

    fn lcd_status(&self, io: &IoRegisters) -> LcdStatus {
        LcdStatus::from_bits_truncate(io.read_byte(LCD_STATUS_REGISTER))
    }

    fn set_mode(&mut self, io: &mut IoRegisters, mode: Mode) {
        let status = self.lcd_status(io).with_mode(mode);
        io.write_byte(LCD_STATUS_REGISTER, status.bits());
    }

    /// Every LY assignment goes through here so LY==LYC is always re-latched.
    fn set_ly(&mut self, io: &mut IoRegisters, line: u8) {
        io.write_byte(LY_REGISTER, line);
        self.compare_line(io, line);
    }

    fn compare_line(&mut self, io: &mut IoRegisters, line: u8) {
        let mut status = self.lcd_status(io);
        let equal = line == io.read_byte(LYC_REGISTER);
        status.set(LcdStatus::LYC_EQUALS_LY, equal);
        io.write_byte(LCD_STATUS_REGISTER, status.bits());
    }

    /// Derive all four STAT sources from the current state, OR them into the
    /// interrupt line and request the LCD interrupt on a rising edge only.
    fn update_stat_line(&mut self, io: &mut IoRegisters) {
        let status = self.lcd_status(io);
        let mode = status.mode();

        self.stat_sources[StatSource::Mode0 as usize] =
            mode == Mode::HBlank && status.contains(LcdStatus::MODE_0_SELECT);
        self.stat_sources[StatSource::Mode1 as usize] =
            mode == Mode::VBlank && status.contains(LcdStatus::MODE_1_SELECT);
        self.stat_sources[StatSource::Mode2 as usize] =
            mode == Mode::OamScan && status.contains(LcdStatus::MODE_2_SELECT);
        self.stat_sources[StatSource::LyLyc as usize] =
            status.contains(LcdStatus::LYC_EQUALS_LY) && status.contains(LcdStatus::LYC_SELECT);

        let level = self.stat_sources.iter().any(|&source| source);
        if level && !self.stat_irq_level {
            io.request_interrupt(Interrupt::LcdStat);
        }
        self.stat_irq_level = level;
    }

    fn vram_accessible(&self, io: &IoRegisters) -> bool {
        if !self.lcd_control(io).contains(LcdControl::PPU_ENABLE) {
            return true;
        }
        self.lcd_status(io).mode() != Mode::Drawing
    }

    fn oam_accessible(&self, io: &IoRegisters) -> bool {
        if !self.lcd_control(io).contains(LcdControl::PPU_ENABLE) {
            return true;
        }
        matches!(self.lcd_status(io).mode(), Mode::HBlank | Mode::VBlank)
    }

    fn sprite_attribute(&self, index: usize) -> SpriteAttribute {
        let base = index * 4;
        SpriteAttribute {
            y_pos: self.oam[base],
            x_pos: self.oam[base + 1],
            tile_number: self.oam[base + 2],
            flags: AttributeFlags::from_bits_truncate(self.oam[base + 3]),
        }
    }

    /// Sprites covering `line`, at most ten, in OAM order.
    fn select_sprites(&self, line: i32, height: i32) -> ArrayVec<[SpriteAttribute; 10]> {
        let mut selected = ArrayVec::new();

        for index in 0..OAM_SPRITE_COUNT {
            let sprite = self.sprite_attribute(index);
            let top = i32::from(sprite.y_pos) - 16;
            if (top..top + height).contains(&line) {
                selected.push(sprite);
                if selected.len() == MAX_SPRITES_PER_LINE {
                    break;
                }
            }
        }

        selected
    }

    /// Compose the scanline at the current LY into the framebuffer.
    fn render_scanline(&mut self, io: &IoRegisters) {
        let line = io.read_byte(LY_REGISTER) as usize;
        debug_assert!(line < RESOLUTION_HEIGHT);

        let lcdc = self.lcd_control(io);
        self.compose_layers(&lcdc);

        let sprites = if lcdc.contains(LcdControl::OBJ_ENABLE) {
            let height = if lcdc.contains(LcdControl::OBJ_SIZE) { 16 } else { 8 };
            self.select_sprites(line as i32, height)
        } else {
            ArrayVec::new()
        };

        let bgp = Palette::from(io.read_byte(BG_PALETTE));
        let object_palettes = [
            Palette::from(io.read_byte(OB_PALETTE_0)),
            Palette::from(io.read_byte(OB_PALETTE_1)),
        ];
        let scy = io.read_byte(SCY_REGISTER) as usize;
        let scx = io.read_byte(SCX_REGISTER) as usize;
        let window_left = i32::from(io.read_byte(WX_REGISTER)) - 7;
        let window_top = i32::from(io.read_byte(WY_REGISTER));
        let window_enabled = lcdc.contains(LcdControl::WINDOW_ENABLE);

        for x in 0..RESOLUTION_WIDTH {
            // The sprite with the smallest raw x wins; ties go to the
            // earliest OAM entry.
            let mut best: Option<&SpriteAttribute> = None;
            for sprite in sprites.iter() {
                let left = i32::from(sprite.x_pos) - 8;
                if (left..left + 8).contains(&(x as i32))
                    && best.map_or(true, |current| sprite.x_pos < current.x_pos)
                {
                    best = Some(sprite);
                }
            }

            let in_window = window_enabled
                && x as i32 >= window_left
                && line as i32 >= window_top;
            let palette_index = if in_window {
                let window_x = (x as i32 - window_left) as usize;
                let window_y = (line as i32 - window_top) as usize;
                self.window_indices[window_y * BG_DIM + window_x]
            } else {
                let bg_y = (line + scy) % BG_DIM;
                let bg_x = (x + scx) % BG_DIM;
                self.bg_indices[bg_y * BG_DIM + bg_x]
            };
            let bg_shade = bgp.shade(palette_index);

            let mut shade = bg_shade;
            if let Some(sprite) = best {
                let behind_bg = sprite.flags.contains(AttributeFlags::OBJ_TO_BG_PRIORITY);
                // Occlusion keys off the raw 2-bit index, before BGP.
                if !behind_bg || palette_index == 0 {
                    let sprite_y = (line as i32 - (i32::from(sprite.y_pos) - 16)) as usize;
                    let sprite_x = (x as i32 - (i32::from(sprite.x_pos) - 8)) as usize;
                    // The lower half of a tall sprite comes from the next tile.
                    let tile_number = sprite.tile_number as usize + usize::from(sprite_y > 7);

                    let tile_offset = tile_number * TILE_BYTES + (sprite_y % 8) * 2;
                    let row =
                        decode_tile_row(self.vram[tile_offset], self.vram[tile_offset + 1]);
                    let sprite_index = row[sprite_x];

                    // Sprite palette index 0 is transparent.
                    if sprite_index != 0 {
                        let palette = object_palettes
                            [sprite.flags.contains(AttributeFlags::PALETTE_NUMBER) as usize];
                        shade = palette.shade(sprite_index);
                    }
                }
            }

            let offset = (line * RESOLUTION_WIDTH + x) * RGBA_CHANNELS;
            self.framebuffer[offset..offset + RGBA_CHANNELS]
                .copy_from_slice(&DISPLAY_PALETTE[shade as usize]);
        }
    }

    /// Refresh both 256x256 index buffers for the coming scanline.
    fn compose_layers(&mut self, lcdc: &LcdControl) {
        let bg_enabled = lcdc.contains(LcdControl::BG_WINDOW_ENABLE);
        let window_enabled = lcdc.contains(LcdControl::WINDOW_ENABLE)
            && (bg_enabled || !self.force_window_color_zero);

        compose_layer(
            &self.vram,
            lcdc,
            bg_enabled,
            lcdc.contains(LcdControl::BG_TILEMAP),
            &mut self.bg_indices,
        );
        compose_layer(
            &self.vram,
            lcdc,
            window_enabled,
            lcdc.contains(LcdControl::WINDOW_TILEMAP),
            &mut self.window_indices,
        );
    }
}

/// Render a full 32x32-tile layer into a 256x256 palette-index buffer.
fn compose_layer(
    vram: &[u8; VRAM_SIZE],
    lcdc: &LcdControl,
    enabled: bool,
    high_tilemap: bool,
    dst: &mut [u8],
) {
    if !enabled {
        for pixel in dst.iter_mut() {
            *pixel = 0;
        }
        return;
    }

    let map_offset = if high_tilemap {
        TILEMAP_9C00_OFFSET
    } else {
        TILEMAP_9800_OFFSET
    };
    let unsigned_indices = lcdc.contains(LcdControl::BG_WINDOW_TILE_ADDR);

    let mut decoded = [0u8; TILE_DIM * TILE_DIM];
    for (map_y, map_x) in (0..32).cartesian_product(0..32) {
        let tile_index = vram[map_offset + map_y * 32 + map_x];
        let data_offset = if unsigned_indices {
            tile_index as usize * TILE_BYTES
        } else {
            (SIGNED_TILE_DATA_OFFSET as i32 + i32::from(tile_index as i8) * TILE_BYTES as i32)
                as usize
        };

        render_tile(&vram[data_offset..data_offset + TILE_BYTES], &mut decoded, TILE_DIM);
        for row in 0..TILE_DIM {
            let dst_offset = (map_y * TILE_DIM + row) * BG_DIM + map_x * TILE_DIM;
            dst[dst_offset..dst_offset + TILE_DIM]
                .copy_from_slice(&decoded[row * TILE_DIM..(row + 1) * TILE_DIM]);
        }
    }
}

impl std::fmt::Debug for Ppu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ppu {{ dot: {}, stat level: {} }}", self.dot, self.stat_irq_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::interrupts::InterruptFlags;

    fn enabled_ppu() -> (Ppu, IoRegisters) {
        let mut io = IoRegisters::new();
        io.write_byte(LCD_CONTROL_REGISTER, 0x91);
        io.write_byte(BG_PALETTE, 0b1110_0100);
        let mut ppu = Ppu::new(true);
        ppu.set_mode(&mut io, Mode::OamScan);
        (ppu, io)
    }

    fn run_dots(ppu: &mut Ppu, io: &mut IoRegisters, dots: u32) {
        for _ in 0..dots {
            ppu.tick(io);
        }
    }

    #[test]
    fn test_mode_timing_over_one_line() {
        let (mut ppu, mut io) = enabled_ppu();

        run_dots(&mut ppu, &mut io, u32::from(OAM_SCAN_DOTS));
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::Drawing);

        run_dots(&mut ppu, &mut io, u32::from(DRAWING_END_DOT - OAM_SCAN_DOTS));
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::HBlank);

        run_dots(&mut ppu, &mut io, u32::from(DOTS_PER_LINE - DRAWING_END_DOT));
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::OamScan);
        assert_eq!(io.read_byte(LY_REGISTER), 1);
    }

    #[test]
    fn test_vblank_interrupt_at_line_144() {
        let (mut ppu, mut io) = enabled_ppu();

        run_dots(
            &mut ppu,
            &mut io,
            u32::from(DOTS_PER_LINE) * u32::from(VBLANK_START_LINE),
        );

        assert_eq!(io.read_byte(LY_REGISTER), 144);
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::VBlank);
        assert!(io.interrupt_flag().contains(InterruptFlags::VBLANK));
    }

    #[test]
    fn test_ly_wraps_after_one_frame() {
        let (mut ppu, mut io) = enabled_ppu();

        run_dots(
            &mut ppu,
            &mut io,
            u32::from(DOTS_PER_LINE) * u32::from(LINES_PER_FRAME),
        );

        assert_eq!(io.read_byte(LY_REGISTER), 0);
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::OamScan);
    }

    #[test]
    fn test_stat_edge_fires_once_while_level_held() {
        let (mut ppu, mut io) = enabled_ppu();
        // Enable the HBlank and LY==LYC sources; LYC matches during line 0.
        io.write_byte(LCD_STATUS_REGISTER, (LcdStatus::MODE_0_SELECT | LcdStatus::LYC_SELECT).bits() | Mode::OamScan as u8);
        io.write_byte(LYC_REGISTER, 0);
        ppu.set_ly(&mut io, 0);

        // LY==LYC raises the line once.
        ppu.tick(&mut io);
        assert!(io.interrupt_flag().contains(InterruptFlags::LCD));
        io.overwrite_if(0);

        // Entering HBlank toggles another source while LY==LYC still holds,
        // so the line never falls and no second interrupt appears.
        run_dots(&mut ppu, &mut io, u32::from(DRAWING_END_DOT));
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::HBlank);
        assert!(!io.interrupt_flag().contains(InterruptFlags::LCD));
    }

    #[test]
    fn test_vram_locked_while_drawing() {
        let (mut ppu, mut io) = enabled_ppu();

        run_dots(&mut ppu, &mut io, u32::from(OAM_SCAN_DOTS));
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::Drawing);

        ppu.write_vram(0x8000, 0x12, &io);
        assert_eq!(ppu.read_vram(0x8000, &io), INVALID_READ);

        // Unlocked again in HBlank.
        run_dots(&mut ppu, &mut io, u32::from(DRAWING_END_DOT - OAM_SCAN_DOTS));
        ppu.write_vram(0x8000, 0x12, &io);
        assert_eq!(ppu.read_vram(0x8000, &io), 0x12);
    }

    #[test]
    fn test_oam_locked_during_scan_and_drawing() {
        let (mut ppu, mut io) = enabled_ppu();

        assert_eq!(ppu.lcd_status(&io).mode(), Mode::OamScan);
        ppu.write_oam(0xFE00, 0x55, &io);
        assert_eq!(ppu.read_oam(0xFE00, &io), INVALID_READ);

        // DMA writes bypass the lock.
        ppu.write_oam_dma(0, 0x55);
        run_dots(&mut ppu, &mut io, u32::from(DRAWING_END_DOT));
        assert_eq!(ppu.read_oam(0xFE00, &io), 0x55);
    }

    #[test]
    fn test_lcd_off_unlocks_and_freezes() {
        let (mut ppu, mut io) = enabled_ppu();
        run_dots(&mut ppu, &mut io, u32::from(OAM_SCAN_DOTS));
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::Drawing);

        io.write_byte(LCD_CONTROL_REGISTER, 0x11);
        ppu.reset(&mut io);

        assert_eq!(io.read_byte(LY_REGISTER), 0);
        assert_eq!(ppu.lcd_status(&io).mode(), Mode::OamScan);
        ppu.write_vram(0x8000, 0x34, &io);
        assert_eq!(ppu.read_vram(0x8000, &io), 0x34);

        // With the LCD off the dot clock stands still.
        run_dots(&mut ppu, &mut io, 1000);
        assert_eq!(io.read_byte(LY_REGISTER), 0);
    }

    #[test]
    fn test_scanline_composition_draws_background_tile() {
        let (mut ppu, mut io) = enabled_ppu();

        // Tile 1 is solid colour 3; the tilemap points tile (0,0) at it.
        for row in 0..8 {
            ppu.vram[TILE_BYTES + row * 2] = 0xFF;
            ppu.vram[TILE_BYTES + row * 2 + 1] = 0xFF;
        }
        ppu.vram[TILEMAP_9800_OFFSET] = 1;

        // Run through line 0's drawing phase.
        run_dots(&mut ppu, &mut io, u32::from(OAM_SCAN_DOTS));

        let black = DISPLAY_PALETTE[3];
        let white = DISPLAY_PALETTE[0];
        assert_eq!(&ppu.framebuffer()[0..4], &black);
        // Pixel (8, 0) is outside the tile and stays at colour 0.
        assert_eq!(&ppu.framebuffer()[8 * RGBA_CHANNELS..9 * RGBA_CHANNELS], &white);
    }

    #[test]
    fn test_sprite_behind_bg_keys_off_raw_index() {
        let (mut ppu, mut io) = enabled_ppu();
        // Sprites on as well.
        io.write_byte(LCD_CONTROL_REGISTER, 0x93);
        io.write_byte(OB_PALETTE_0, 0b1110_0100);
        // BGP maps index 0 to shade 3; occlusion must still treat it as
        // transparent background.
        io.write_byte(BG_PALETTE, 0b1110_0111);

        // Tile 1 is solid index 3, tile 2 is solid index 1.
        for row in 0..8 {
            ppu.vram[TILE_BYTES + row * 2] = 0xFF;
            ppu.vram[TILE_BYTES + row * 2 + 1] = 0xFF;
            ppu.vram[2 * TILE_BYTES + row * 2] = 0xFF;
        }
        // The leftmost background tile is solid, the rest stay index 0.
        ppu.vram[TILEMAP_9800_OFFSET] = 1;

        // Two behind-background sprites: one over the solid tile, one over
        // index-0 background.
        let flags = AttributeFlags::OBJ_TO_BG_PRIORITY.bits();
        for (entry, bytes) in [[16u8, 8, 2, flags], [16, 24, 2, flags]].iter().enumerate() {
            for (offset, byte) in bytes.iter().enumerate() {
                ppu.write_oam_dma((entry * 4 + offset) as u8, *byte);
            }
        }

        run_dots(&mut ppu, &mut io, u32::from(OAM_SCAN_DOTS));

        // Over background index 3 the sprite is hidden.
        assert_eq!(&ppu.framebuffer()[0..4], &DISPLAY_PALETTE[3]);
        // Over background index 0 the sprite shows, even though BGP maps
        // that index to a nonzero shade.
        assert_eq!(
            &ppu.framebuffer()[16 * RGBA_CHANNELS..17 * RGBA_CHANNELS],
            &DISPLAY_PALETTE[1]
        );
        // Plain background index 0 away from both sprites.
        assert_eq!(
            &ppu.framebuffer()[32 * RGBA_CHANNELS..33 * RGBA_CHANNELS],
            &DISPLAY_PALETTE[3]
        );
    }

    #[test]
    fn test_sprite_priority_and_transparency() {
        let (mut ppu, mut io) = enabled_ppu();
        // Sprites on as well.
        io.write_byte(LCD_CONTROL_REGISTER, 0x93);
        io.write_byte(OB_PALETTE_0, 0b1110_0100);

        // Sprite tile 2: left half colour 1, right half transparent.
        for row in 0..8 {
            ppu.vram[2 * TILE_BYTES + row * 2] = 0xF0;
        }
        // Sprite at screen origin, OAM entry 0.
        ppu.write_oam_dma(0, 16);
        ppu.write_oam_dma(1, 8);
        ppu.write_oam_dma(2, 2);
        ppu.write_oam_dma(3, 0);

        run_dots(&mut ppu, &mut io, u32::from(OAM_SCAN_DOTS));

        let shade_1 = DISPLAY_PALETTE[1];
        let white = DISPLAY_PALETTE[0];
        assert_eq!(&ppu.framebuffer()[0..4], &shade_1);
        // Transparent sprite pixels leave the background visible.
        assert_eq!(&ppu.framebuffer()[4 * RGBA_CHANNELS..5 * RGBA_CHANNELS], &white);
    }
}
