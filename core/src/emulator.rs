//! The assembled machine: one `tick()` advances the master clock by a single
//! period, stepping the CPU and cascading into the timer, PPU, APU and DMA
//! engine. Frontends drive it a frame at a time and read back the
//! framebuffer, audio queue and serial log.

use crate::hardware::apu::AudioQueue;
use crate::hardware::cartridge::{CartError, Cartridge};
use crate::hardware::cpu::registers::Registers;
use crate::hardware::cpu::Cpu;
use crate::hardware::mmu::Memory;
use crate::io::joypad::JoypadState;
use crate::EmulatorOptions;

/// The master clock rate in Hz; one M-cycle is four of these.
pub const DMG_CLOCK_SPEED: u64 = 4_194_304;
/// Master cycles per frame: 154 scanlines of 456 dots.
pub const CYCLES_PER_FRAME: u64 = 70_224;

pub struct Emulator {
    cpu: Cpu<Memory>,
    paused: bool,
}

impl Emulator {
    /// Build a machine around the provided ROM image.
    pub fn new(rom: &[u8], mut options: EmulatorOptions) -> Result<Self, CartError> {
        let cartridge = Cartridge::new(rom, options.saved_ram.take())?;
        let memory = Memory::new(cartridge, &options);

        Ok(Emulator {
            cpu: Cpu::new(memory, options.debug),
            paused: false,
        })
    }

    /// Advance the whole machine by one master cycle: CPU substep, then
    /// timer, PPU, APU and DMA. Returns whether the CPU has signalled STOP.
    pub fn tick(&mut self) -> bool {
        self.cpu.tick();
        self.cpu.mmu.tick_components();
        self.cpu.stopped
    }

    /// Latch `input` and run one frame's worth of master cycles. Returns
    /// early if the CPU signals STOP; does nothing while paused.
    pub fn run_frame(&mut self, input: &JoypadState) -> bool {
        self.cpu.mmu.latch_input(input);

        if self.paused {
            return self.cpu.stopped;
        }

        for _ in 0..CYCLES_PER_FRAME {
            if self.tick() {
                return true;
            }
        }
        false
    }

    /// Run master cycles until the in-flight instruction has fully retired.
    pub fn step_instruction(&mut self) {
        loop {
            self.tick();
            if self.cpu.cycles_until_next_instr == 0 {
                break;
            }
        }
    }

    /// Advance exactly one master cycle.
    pub fn step_cycle(&mut self) -> bool {
        self.tick()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a configured breakpoint matches the current CPU state.
    pub fn wants_break(&self) -> bool {
        self.cpu.wants_break()
    }

    /// The 160x144 RGBA8 framebuffer, row major from the top left.
    pub fn framebuffer(&self) -> &[u8] {
        self.cpu.mmu.ppu.framebuffer()
    }

    /// A clonable handle the audio device callback drains.
    pub fn audio_queue(&self) -> AudioQueue {
        self.cpu.mmu.apu.audio_queue()
    }

    /// Everything written to the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        self.cpu.mmu.io_registers.serial_output()
    }

    /// The loaded cartridge, e.g. for persisting external RAM.
    pub fn cartridge(&self) -> &Cartridge {
        &self.cpu.mmu.cartridge
    }

    /// Register file access for debugger overlays.
    pub fn registers(&self) -> &Registers {
        &self.cpu.registers
    }
}
