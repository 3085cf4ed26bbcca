pub mod emulator;
pub mod hardware;
pub mod io;
pub mod support;

pub use crate::emulator::Emulator;
pub use crate::hardware::apu::AudioQueue;
pub use crate::io::joypad::JoypadState;

use nanoserde::{DeJson, SerJson};

/// Debugger hooks threaded into the emulator at construction; frontends can
/// persist these as JSON alongside their own settings.
#[derive(Debug, Clone, SerJson, DeJson)]
pub struct DebugSettings {
    pub break_on_pc: Option<u16>,
    pub break_on_opcode: Option<u8>,
    pub break_on_opcode_prefixed: Option<u8>,
    pub break_on_write_address: Option<u16>,
}

impl Default for DebugSettings {
    fn default() -> Self {
        DebugSettings {
            break_on_pc: None,
            break_on_opcode: None,
            break_on_opcode_prefixed: None,
            break_on_write_address: None,
        }
    }
}

/// Struct for wrapping all the various options for the `Emulator`.
#[derive(Debug)]
pub struct EmulatorOptions {
    pub boot_rom: Option<[u8; 256]>,
    pub saved_ram: Option<Vec<u8>>,
    pub debug: DebugSettings,
    /// Compatibility quirk: when the background is disabled the window is
    /// rendered as background colour 0 instead of its own tiles.
    pub force_window_color_zero: bool,
}

#[derive(Debug)]
pub struct EmulatorOptionsBuilder {
    boot_rom: Option<[u8; 256]>,
    saved_ram: Option<Vec<u8>>,
    debug: DebugSettings,
    force_window_color_zero: bool,
}

impl EmulatorOptionsBuilder {
    pub fn new() -> Self {
        EmulatorOptionsBuilder {
            boot_rom: None,
            saved_ram: None,
            debug: DebugSettings::default(),
            force_window_color_zero: true,
        }
    }

    pub fn boot_rom(mut self, boot_rom: Option<[u8; 256]>) -> Self {
        self.boot_rom = boot_rom;
        self
    }

    pub fn saved_ram(mut self, saved_ram: Option<Vec<u8>>) -> Self {
        self.saved_ram = saved_ram;
        self
    }

    pub fn debug(mut self, debug: DebugSettings) -> Self {
        self.debug = debug;
        self
    }

    pub fn force_window_color_zero(mut self, force: bool) -> Self {
        self.force_window_color_zero = force;
        self
    }

    pub fn build(self) -> EmulatorOptions {
        EmulatorOptions {
            boot_rom: self.boot_rom,
            saved_ram: self.saved_ram,
            debug: self.debug,
            force_window_color_zero: self.force_window_color_zero,
        }
    }
}

impl Default for EmulatorOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<EmulatorOptions> for EmulatorOptionsBuilder {
    fn from(options: EmulatorOptions) -> Self {
        EmulatorOptionsBuilder {
            boot_rom: options.boot_rom,
            saved_ram: options.saved_ram,
            debug: options.debug,
            force_window_color_zero: options.force_window_color_zero,
        }
    }
}
