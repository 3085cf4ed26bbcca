//! The memory bus: address decoding across the cartridge, video memory,
//! work RAM, I/O registers and HRAM, the behavioural register writes, and
//! the per-master-cycle cascade into the timer, PPU, APU and OAM DMA.

use std::fmt;
use std::fmt::Debug;

use log::*;

use crate::hardware::apu::{
    Apu, APU_MEM_END, APU_MEM_START, NR50, NR51, NR52, WAVE_SAMPLE_END, WAVE_SAMPLE_START,
};
use crate::hardware::cartridge::Cartridge;
use crate::hardware::mmu::dma::OamDma;
use crate::hardware::mmu::hram::Hram;
use crate::hardware::mmu::wram::Wram;
use crate::hardware::ppu::{
    Ppu, BG_PALETTE, DMA_TRANSFER, LCD_CONTROL_REGISTER, LCD_STATUS_REGISTER, LYC_REGISTER,
    LY_REGISTER, OB_PALETTE_0, OB_PALETTE_1,
};
use crate::io::bootrom::BootRom;
use crate::io::interrupts::{Interrupt, InterruptFlags};
use crate::io::io_registers::{
    IoRegisters, BOOTROM_DISABLE, INTERRUPTS_ENABLE, INTERRUPTS_FLAG, INVALID_READ, SIO_CONTROL,
    SIO_DATA,
};
use crate::io::joypad::{JoyPad, JoypadState, JOYPAD_REGISTER};
use crate::io::timer::{Timer, DIVIDER_REGISTER, TIMER_CONTROL, TIMER_COUNTER, TIMER_MODULO};
use crate::EmulatorOptions;

pub mod dma;
mod hram;
mod wram;

/// 16 KiB ROM bank 00, always mapped.
pub const ROM_BANK_00_START: u16 = 0x0000;
pub const ROM_BANK_00_END: u16 = 0x3FFF;
/// 16 KiB switchable ROM bank.
pub const ROM_BANK_NN_START: u16 = 0x4000;
pub const ROM_BANK_NN_END: u16 = 0x7FFF;
/// 8 KiB of VRAM, gated by the PPU while it draws.
pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;
/// External cartridge RAM, if the cart carries any.
pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;
/// 8 KiB work RAM.
pub const WRAM_START: u16 = 0xC000;
pub const WRAM_END: u16 = 0xDFFF;
/// Mirror of 0xC000..0xDDFF.
pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFDFF;
/// Subtract this from an echo address to reach the backing WRAM.
pub const ECHO_RAM_OFFSET: u16 = 0x2000;
/// Sprite attribute table, gated by the PPU during OAM scan and drawing.
pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;
/// Reads 0xFF, writes vanish.
pub const NOT_USABLE_START: u16 = 0xFEA0;
pub const NOT_USABLE_END: u16 = 0xFEFF;
/// High RAM.
pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;

use crate::io::io_registers::{IO_END, IO_START};

/// Byte-level bus access plus the handful of CPU-visible side channels.
/// The CPU core is generic over this so its tests can run against a flat
/// memory instead of the full machine.
pub trait MemoryMapper: Debug {
    fn read_byte(&self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);
    fn boot_rom_finished(&self) -> bool;
    fn interrupt_flag(&self) -> InterruptFlags;
    fn interrupt_enable(&self) -> InterruptFlags;
    fn clear_interrupt(&mut self, interrupt: Interrupt);

    fn read_short(&self, address: u16) -> u16 {
        crate::support::word(self.read_byte(address.wrapping_add(1)), self.read_byte(address))
    }

    fn write_short(&mut self, address: u16, value: u16) {
        self.write_byte(address, value as u8);
        self.write_byte(address.wrapping_add(1), (value >> 8) as u8);
    }

    /// A 4 byte little endian read, sized for the longest instruction plus
    /// its opcode.
    fn read_dword(&self, address: u16) -> u32 {
        u32::from(self.read_byte(address))
            | u32::from(self.read_byte(address.wrapping_add(1))) << 8
            | u32::from(self.read_byte(address.wrapping_add(2))) << 16
            | u32::from(self.read_byte(address.wrapping_add(3))) << 24
    }
}

pub struct Memory {
    boot_rom: BootRom,
    pub cartridge: Cartridge,
    pub ppu: Ppu,
    pub apu: Apu,
    pub timer: Timer,
    pub joypad: JoyPad,
    pub io_registers: IoRegisters,
    hram: Hram,
    wram: Wram,
    oam_dma: OamDma,
    /// Master cycles since the last M-cycle boundary.
    cycle_phase: u8,
}

impl Memory {
    pub fn new(cartridge: Cartridge, options: &EmulatorOptions) -> Self {
        let mut result = Memory {
            boot_rom: BootRom::new(options.boot_rom),
            cartridge,
            ppu: Ppu::new(options.force_window_color_zero),
            apu: Apu::new(),
            timer: Timer::new(),
            joypad: JoyPad::new(),
            io_registers: IoRegisters::new(),
            hram: Hram::new(),
            wram: Wram::new(),
            oam_dma: OamDma::new(),
            cycle_phase: 0,
        };

        if result.boot_rom.is_finished {
            result.apply_post_boot_state();
        }

        result
    }

    /// The register file contents the boot sequence leaves behind, applied
    /// when running without a boot ROM image.
    fn apply_post_boot_state(&mut self) {
        let io = &mut self.io_registers;
        io.write_byte(JOYPAD_REGISTER, 0xCF);
        io.write_byte(SIO_CONTROL, 0x7E);
        io.write_byte(LCD_CONTROL_REGISTER, 0x91);
        io.write_byte(LCD_STATUS_REGISTER, 0x86);
        io.write_byte(BG_PALETTE, 0xFC);
        io.write_byte(OB_PALETTE_0, 0xFF);
        io.write_byte(OB_PALETTE_1, 0xFF);
        io.write_byte(NR52, 0x80);
        io.write_byte(NR50, 0x77);
        io.write_byte(NR51, 0xF3);
        io.write_byte(BOOTROM_DISABLE, 0x01);
        io.write_byte(DIVIDER_REGISTER, 0xAB);
        self.timer.system_clock = 0xAB00;
    }

    /// Advance every non-CPU component by one master cycle. The timer and
    /// the DMA engine move in M-cycle steps, the PPU and APU every cycle.
    pub fn tick_components(&mut self) {
        self.cycle_phase = (self.cycle_phase + 1) & 0x3;
        let m_cycle_boundary = self.cycle_phase == 0;

        if m_cycle_boundary {
            self.timer.tick(&mut self.io_registers);
        }
        self.ppu.tick(&mut self.io_registers);
        self.apu.tick(&mut self.io_registers);
        if m_cycle_boundary {
            self.pump_oam_dma();
        }
    }

    /// Latch a fresh input snapshot; called by the frontend once per frame.
    pub fn latch_input(&mut self, input: &JoypadState) {
        self.joypad.latch(input);
        self.io_registers
            .write_byte(JOYPAD_REGISTER, self.joypad.read_register());
    }

    pub fn read_byte(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x00FF if !self.boot_rom.is_finished => self.boot_rom.read_byte(address),
            ROM_BANK_00_START..=ROM_BANK_00_END => self.cartridge.read_rom_low(address),
            ROM_BANK_NN_START..=ROM_BANK_NN_END => self.cartridge.read_rom_high(address),
            VRAM_START..=VRAM_END => self.ppu.read_vram(address, &self.io_registers),
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self.cartridge.read_external_ram(address),
            WRAM_START..=WRAM_END => self.wram.read_byte(address),
            ECHO_RAM_START..=ECHO_RAM_END => self.wram.read_echo(address),
            OAM_START..=OAM_END => self.ppu.read_oam(address, &self.io_registers),
            NOT_USABLE_START..=NOT_USABLE_END => self.non_usable_call(address),
            IO_START..=IO_END => self.read_io_byte(address),
            HRAM_START..=HRAM_END => self.hram.read_byte(address),
            INTERRUPTS_ENABLE => self.io_registers.interrupt_enable().bits(),
        }
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        match address {
            ROM_BANK_00_START..=ROM_BANK_NN_END => self.cartridge.write_byte(address, value),
            VRAM_START..=VRAM_END => self.ppu.write_vram(address, value, &self.io_registers),
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self.cartridge.write_byte(address, value),
            WRAM_START..=WRAM_END => self.wram.write_byte(address, value),
            ECHO_RAM_START..=ECHO_RAM_END => self.wram.write_echo(address, value),
            OAM_START..=OAM_END => self.ppu.write_oam(address, value, &self.io_registers),
            NOT_USABLE_START..=NOT_USABLE_END => {
                trace!("Write to unusable memory at {:#06X} dropped", address)
            }
            IO_START..=IO_END => self.write_io_byte(address, value),
            HRAM_START..=HRAM_END => self.hram.write_byte(address, value),
            INTERRUPTS_ENABLE => self.io_registers.overwrite_ie(value),
        }
    }

    fn read_io_byte(&self, address: u16) -> u8 {
        match address {
            JOYPAD_REGISTER => self.joypad.read_register(),
            INTERRUPTS_FLAG => self.io_registers.interrupt_flag().bits(),
            NR52 => self.apu.read_nr52(&self.io_registers),
            _ => self.io_registers.read_byte(address),
        }
    }

    fn write_io_byte(&mut self, address: u16, value: u8) {
        match address {
            JOYPAD_REGISTER => {
                self.joypad.write_register(value);
                self.io_registers
                    .write_byte(JOYPAD_REGISTER, self.joypad.read_register());
            }
            SIO_DATA => self.io_registers.push_serial(value),
            DIVIDER_REGISTER => self.timer.write_divider(&mut self.io_registers),
            TIMER_COUNTER => self.timer.write_counter(&mut self.io_registers, value),
            // TMA is a plain byte; the timer reads it at reload time.
            TIMER_MODULO => self.io_registers.write_byte(address, value),
            TIMER_CONTROL => self.timer.write_control(&mut self.io_registers, value),
            INTERRUPTS_FLAG => self.io_registers.overwrite_if(value),
            APU_MEM_START..=APU_MEM_END => {
                self.apu
                    .write_register(&mut self.io_registers, address, value)
            }
            WAVE_SAMPLE_START..=WAVE_SAMPLE_END => self.io_registers.write_byte(address, value),
            LCD_CONTROL_REGISTER => self.write_lcd_control(value),
            LCD_STATUS_REGISTER => {
                // Only the interrupt select bits are writable.
                let current = self.io_registers.read_byte(LCD_STATUS_REGISTER);
                self.io_registers
                    .write_byte(LCD_STATUS_REGISTER, 0x80 | (value & 0x78) | (current & 0x07));
            }
            LY_REGISTER => trace!("Dropped write to the read-only LY register"),
            LYC_REGISTER => self.ppu.write_lyc(&mut self.io_registers, value),
            DMA_TRANSFER => {
                self.io_registers.write_byte(DMA_TRANSFER, value);
                self.oam_dma.start(value);
            }
            BOOTROM_DISABLE => {
                // Any nonzero write permanently unmaps the boot ROM.
                if value != 0 && !self.boot_rom.is_finished {
                    self.boot_rom.is_finished = true;
                    self.io_registers.write_byte(BOOTROM_DISABLE, value);
                    info!("Boot ROM unmapped");
                }
            }
            _ => self.io_registers.write_byte(address, value),
        }
    }

    fn write_lcd_control(&mut self, value: u8) {
        let was_enabled = self.io_registers.read_byte(LCD_CONTROL_REGISTER) & 0x80 != 0;
        let now_enabled = value & 0x80 != 0;
        self.io_registers.write_byte(LCD_CONTROL_REGISTER, value);

        if was_enabled != now_enabled {
            debug!("LCD turned {}", if now_enabled { "on" } else { "off" });
            // Either edge restarts the PPU from the top of the frame; while
            // off it simply never ticks.
            self.ppu.reset(&mut self.io_registers);
        }
    }

    /// One DMA byte moves per M-cycle, straight into OAM past the lockout.
    fn pump_oam_dma(&mut self) {
        if let Some((index, source)) = self.oam_dma.next_byte() {
            let value = self.read_byte(source);
            self.ppu.write_oam_dma(index, value);
        }
    }

    fn non_usable_call(&self, address: u16) -> u8 {
        warn!("Read of unusable memory at {:#06X}", address);
        INVALID_READ
    }
}

impl MemoryMapper for Memory {
    fn read_byte(&self, address: u16) -> u8 {
        Memory::read_byte(self, address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        Memory::write_byte(self, address, value)
    }

    fn boot_rom_finished(&self) -> bool {
        self.boot_rom.is_finished
    }

    fn interrupt_flag(&self) -> InterruptFlags {
        self.io_registers.interrupt_flag()
    }

    fn interrupt_enable(&self) -> InterruptFlags {
        self.io_registers.interrupt_enable()
    }

    fn clear_interrupt(&mut self, interrupt: Interrupt) {
        self.io_registers.clear_interrupt(interrupt);
    }

    fn read_dword(&self, address: u16) -> u32 {
        // Instruction fetches out of ROM read the padded image directly so
        // a fetch at the final byte stays in bounds.
        if address <= ROM_BANK_NN_END && self.boot_rom.is_finished {
            self.cartridge.read_dword(address)
        } else {
            u32::from(self.read_byte(address))
                | u32::from(self.read_byte(address.wrapping_add(1))) << 8
                | u32::from(self.read_byte(address.wrapping_add(2))) << 16
                | u32::from(self.read_byte(address.wrapping_add(3))) << 24
        }
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Memory {{ {:?}, {:?}, io: {:?} }}",
            self.cartridge, self.boot_rom, self.io_registers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::ppu::Mode;
    use crate::EmulatorOptionsBuilder;

    fn test_memory() -> Memory {
        let mut rom = vec![0u8; 0x8000];
        rom[0x149] = 0x02;
        let cartridge = Cartridge::new(&rom, None).unwrap();
        Memory::new(cartridge, &EmulatorOptionsBuilder::new().build())
    }

    #[test]
    fn test_echo_ram_mirrors_wram_through_the_bus() {
        let mut memory = test_memory();

        memory.write_byte(0xC123, 0x42);
        assert_eq!(memory.read_byte(0xE123), 0x42);

        memory.write_byte(0xFDFF, 0x55);
        assert_eq!(memory.read_byte(0xDDFF), 0x55);
    }

    #[test]
    fn test_unusable_region() {
        let mut memory = test_memory();

        memory.write_byte(0xFEA0, 0x12);
        assert_eq!(memory.read_byte(0xFEA0), 0xFF);
    }

    #[test]
    fn test_rom_writes_reach_the_mapper_not_the_rom() {
        let mut memory = test_memory();

        let before = memory.read_byte(0x0100);
        memory.write_byte(0x0100, 0xAA);
        assert_eq!(memory.read_byte(0x0100), before);
    }

    #[test]
    fn test_interrupt_registers_mask() {
        let mut memory = test_memory();

        memory.write_byte(0xFF0F, 0xFF);
        assert_eq!(memory.read_byte(0xFF0F), 0x1F);

        memory.write_byte(0xFFFF, 0xFF);
        assert_eq!(memory.read_byte(0xFFFF), 0x1F);
    }

    #[test]
    fn test_serial_write_appends_to_log() {
        let mut memory = test_memory();

        memory.write_byte(0xFF01, b'H');
        memory.write_byte(0xFF01, b'i');

        assert_eq!(memory.io_registers.serial_output(), b"Hi");
    }

    #[test]
    fn test_ly_is_read_only() {
        let mut memory = test_memory();

        memory.write_byte(LY_REGISTER, 0x99);
        assert_eq!(memory.read_byte(LY_REGISTER), 0);
    }

    #[test]
    fn test_oam_dma_copies_over_160_m_cycles() {
        let mut memory = test_memory();
        for i in 0..0xA0u16 {
            memory.write_byte(0xC100 + i, i as u8);
        }

        memory.write_byte(DMA_TRANSFER, 0xC1);
        // 160 M-cycles of pumping.
        for _ in 0..160 * 4 {
            memory.tick_components();
        }

        // Wait out VBlank so OAM is readable again.
        while memory.io_registers.read_byte(LY_REGISTER) < 144 {
            memory.tick_components();
        }
        for i in 0..0xA0u16 {
            assert_eq!(memory.read_byte(0xFE00 + i), i as u8);
        }
    }

    #[test]
    fn test_lcd_disable_resets_ppu() {
        let mut memory = test_memory();

        // Run into the middle of a frame.
        for _ in 0..10_000 {
            memory.tick_components();
        }
        assert_ne!(memory.read_byte(LY_REGISTER), 0);

        memory.write_byte(LCD_CONTROL_REGISTER, 0x11);
        assert_eq!(memory.read_byte(LY_REGISTER), 0);
        let status = memory.read_byte(LCD_STATUS_REGISTER);
        assert_eq!(status & 0x3, Mode::OamScan as u8);

        // VRAM is open while the LCD is off.
        memory.write_byte(0x8000, 0x42);
        assert_eq!(memory.read_byte(0x8000), 0x42);
    }

    #[test]
    fn test_stat_writes_preserve_read_only_bits() {
        let mut memory = test_memory();
        let mode_bits = memory.read_byte(LCD_STATUS_REGISTER) & 0x07;

        memory.write_byte(LCD_STATUS_REGISTER, 0x07);

        assert_eq!(memory.read_byte(LCD_STATUS_REGISTER) & 0x07, mode_bits);
    }

    #[test]
    fn test_bootrom_latch_is_permanent() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0000] = 0x42;
        let cartridge = Cartridge::new(&rom, None).unwrap();
        let options = EmulatorOptionsBuilder::new()
            .boot_rom(Some([0xAA; 0x100]))
            .build();
        let mut memory = Memory::new(cartridge, &options);

        assert_eq!(memory.read_byte(0x0000), 0xAA);

        memory.write_byte(0xFF50, 0x01);
        assert_eq!(memory.read_byte(0x0000), 0x42);

        memory.write_byte(0xFF50, 0x00);
        assert_eq!(memory.read_byte(0x0000), 0x42);
    }

    #[test]
    fn test_joypad_row_select_through_the_bus() {
        let mut memory = test_memory();
        memory.latch_input(&JoypadState {
            a: true,
            ..Default::default()
        });

        memory.write_byte(JOYPAD_REGISTER, 0x10);
        assert_eq!(memory.read_byte(JOYPAD_REGISTER) & 0x0F, 0b1110);

        memory.write_byte(JOYPAD_REGISTER, 0x20);
        assert_eq!(memory.read_byte(JOYPAD_REGISTER) & 0x0F, 0x0F);
    }
}
