//! Cartridge loading and bank controller emulation.
//!
//! The raw ROM image is kept with 3 zero bytes of padding at the end so the
//! CPU's 32-bit instruction fetch stays in bounds even at the very last
//! byte. All bus addresses are translated through the active mapper state
//! before touching the image.

use std::fmt;

use log::*;

use crate::hardware::cartridge::header::CartridgeHeader;
use crate::hardware::mmu::{EXTERNAL_RAM_START, ROM_BANK_NN_START};
use crate::io::io_registers::INVALID_READ;

pub mod header;

/// 16 KiB per ROM bank.
pub const ROM_BANK_SIZE: usize = 0x4000;
/// 8 KiB per external RAM bank.
pub const RAM_BANK_SIZE: usize = 0x2000;
/// Allows a 4 byte read starting at the final ROM byte.
const ROM_PADDING: usize = 3;

/// Raised when the provided ROM image cannot back a cartridge.
#[derive(Debug, PartialEq, Eq)]
pub enum CartError {
    /// The image is smaller than the 32 KiB minimum.
    TooSmall(usize),
}

impl fmt::Display for CartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartError::TooSmall(size) => {
                write!(f, "cart load failed: image is {} bytes, need at least 32768", size)
            }
        }
    }
}

impl std::error::Error for CartError {}

/// The bank controller identified from header byte 0x0147.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapperKind {
    RomOnly,
    Mbc1,
}

impl MapperKind {
    fn from_cartridge_type(value: u8) -> Self {
        match value {
            0x00 => MapperKind::RomOnly,
            0x01..=0x03 => MapperKind::Mbc1,
            _ => {
                warn!("Unsupported mapper {:#04X}, treating as ROM only", value);
                MapperKind::RomOnly
            }
        }
    }
}

/// The MBC1 register file.
#[derive(Debug)]
struct Mbc1State {
    /// 5-bit ROM bank select; selecting 0 maps bank 1.
    rom_bank: u8,
    /// 2-bit upper bank bits, shared between ROM and RAM banking.
    upper_bits: u8,
    ram_enabled: bool,
    /// The banking mode latch: when set the upper bits select the RAM bank.
    advanced_banking: bool,
}

impl Default for Mbc1State {
    fn default() -> Self {
        Mbc1State {
            rom_bank: 1,
            upper_bits: 0,
            ram_enabled: false,
            advanced_banking: false,
        }
    }
}

pub struct Cartridge {
    header: CartridgeHeader,
    mapper: MapperKind,
    mbc1: Mbc1State,
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl Cartridge {
    pub fn new(rom: &[u8], saved_ram: Option<Vec<u8>>) -> Result<Self, CartError> {
        if rom.len() < 2 * ROM_BANK_SIZE {
            return Err(CartError::TooSmall(rom.len()));
        }

        let header = CartridgeHeader::new(rom);
        let mapper = MapperKind::from_cartridge_type(header.cartridge_type);
        info!(
            "Loaded cart '{}' ({:?}, {} KiB ROM, {} KiB RAM)",
            header.title,
            mapper,
            rom.len() / 1024,
            header.ram_size_bytes() / 1024
        );

        let mut padded = Vec::with_capacity(rom.len() + ROM_PADDING);
        padded.extend_from_slice(rom);
        padded.extend_from_slice(&[0; ROM_PADDING]);

        let ram_size = header.ram_size_bytes();
        let ram = match saved_ram {
            Some(saved) if saved.len() == ram_size => saved,
            Some(saved) => {
                warn!(
                    "Saved RAM is {} bytes but the cart declares {}, ignoring it",
                    saved.len(),
                    ram_size
                );
                vec![INVALID_READ; ram_size]
            }
            None => vec![INVALID_READ; ram_size],
        };

        Ok(Cartridge {
            header,
            mapper,
            mbc1: Mbc1State::default(),
            rom: padded,
            ram,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn mapper(&self) -> MapperKind {
        self.mapper
    }

    /// The external RAM contents, for save-game persistence by the frontend.
    pub fn external_ram(&self) -> &[u8] {
        &self.ram
    }

    /// Read from the fixed bank region 0x0000..0x3FFF.
    pub fn read_rom_low(&self, address: u16) -> u8 {
        self.rom[address as usize]
    }

    /// Read from the switchable bank region 0x4000..0x7FFF.
    pub fn read_rom_high(&self, address: u16) -> u8 {
        self.rom[self.high_bank_offset(address)]
    }

    /// A little endian 4 byte read used by the CPU's instruction fetch; the
    /// ROM padding keeps this in bounds at the final byte.
    pub fn read_dword(&self, address: u16) -> u32 {
        let offset = if address < ROM_BANK_NN_START {
            address as usize
        } else {
            self.high_bank_offset(address)
        };

        u32::from(self.rom[offset])
            | u32::from(self.rom[offset + 1]) << 8
            | u32::from(self.rom[offset + 2]) << 16
            | u32::from(self.rom[offset + 3]) << 24
    }

    pub fn read_external_ram(&self, address: u16) -> u8 {
        if self.ram.is_empty() || !self.ram_readable() {
            return INVALID_READ;
        }

        self.ram[self.ram_offset(address)]
    }

    /// Handle a CPU write anywhere in cartridge space. ROM-area writes drive
    /// the mapper registers; for mapperless carts they are logged and
    /// dropped.
    pub fn write_byte(&mut self, address: u16, value: u8) {
        match self.mapper {
            MapperKind::RomOnly => self.write_rom_only(address, value),
            MapperKind::Mbc1 => self.write_mbc1(address, value),
        }
    }

    fn write_rom_only(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => {
                warn!("Write to read-only ROM address {:#06X} ignored", address)
            }
            _ => {
                if !self.ram.is_empty() {
                    let offset = self.ram_offset(address);
                    self.ram[offset] = value;
                }
            }
        }
    }

    fn write_mbc1(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.mbc1.ram_enabled = (value & 0xF) == 0xA,
            0x2000..=0x3FFF => {
                let mut bank = value & 0x1F;
                if bank == 0 {
                    bank = 1;
                }
                self.mbc1.rom_bank = bank;
            }
            0x4000..=0x5FFF => self.mbc1.upper_bits = value & 0x3,
            0x6000..=0x7FFF => self.mbc1.advanced_banking = (value & 0x1) == 0x1,
            _ => {
                if self.mbc1.ram_enabled && !self.ram.is_empty() {
                    let offset = self.ram_offset(address);
                    self.ram[offset] = value;
                } else {
                    warn!("Write to disabled cart RAM at {:#06X} ignored", address);
                }
            }
        }
    }

    fn ram_readable(&self) -> bool {
        match self.mapper {
            MapperKind::RomOnly => true,
            MapperKind::Mbc1 => self.mbc1.ram_enabled,
        }
    }

    fn rom_bank_count(&self) -> usize {
        (self.rom.len() - ROM_PADDING) / ROM_BANK_SIZE
    }

    fn high_bank_offset(&self, address: u16) -> usize {
        let bank = match self.mapper {
            MapperKind::RomOnly => 1,
            MapperKind::Mbc1 => {
                let bank = (usize::from(self.mbc1.upper_bits) << 5) | usize::from(self.mbc1.rom_bank);
                bank % self.rom_bank_count()
            }
        };

        bank * ROM_BANK_SIZE + (address as usize - ROM_BANK_SIZE)
    }

    fn ram_offset(&self, address: u16) -> usize {
        let bank = match self.mapper {
            MapperKind::Mbc1 if self.mbc1.advanced_banking => usize::from(self.mbc1.upper_bits),
            _ => 0,
        };

        (bank * RAM_BANK_SIZE + (address - EXTERNAL_RAM_START) as usize) % self.ram.len()
    }
}

impl fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cartridge {{ title: {:?}, mapper: {:?}, rom banks: {} }}",
            self.header.title,
            self.mapper,
            self.rom_bank_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rom(banks: usize, cartridge_type: u8) -> Vec<u8> {
        let mut rom = vec![0u8; banks * ROM_BANK_SIZE];
        rom[0x147] = cartridge_type;
        rom[0x149] = 0x03;
        // Tag the first byte of every bank with its index.
        for bank in 0..banks {
            rom[bank * ROM_BANK_SIZE] = bank as u8;
        }
        rom
    }

    #[test]
    fn test_undersized_rom_is_rejected() {
        assert_eq!(
            Cartridge::new(&[0u8; 0x100], None).unwrap_err(),
            CartError::TooSmall(0x100)
        );
    }

    #[test]
    fn test_rom_only_identity_mapping() {
        let cart = Cartridge::new(&make_rom(2, 0x00), None).unwrap();

        assert_eq!(cart.mapper(), MapperKind::RomOnly);
        assert_eq!(cart.read_rom_low(0x0000), 0);
        assert_eq!(cart.read_rom_high(0x4000), 1);
    }

    #[test]
    fn test_rom_only_ignores_rom_writes() {
        let mut cart = Cartridge::new(&make_rom(2, 0x00), None).unwrap();

        cart.write_byte(0x2000, 0x05);
        assert_eq!(cart.read_rom_high(0x4000), 1);
    }

    #[test]
    fn test_mbc1_bank_select() {
        let mut cart = Cartridge::new(&make_rom(8, 0x01), None).unwrap();

        cart.write_byte(0x2000, 0x05);
        assert_eq!(cart.read_rom_high(0x4000), 5);
    }

    #[test]
    fn test_mbc1_bank_zero_maps_bank_one() {
        let mut cart = Cartridge::new(&make_rom(8, 0x01), None).unwrap();

        cart.write_byte(0x2000, 0x00);
        assert_eq!(cart.read_rom_high(0x4000), 1);
    }

    #[test]
    fn test_mbc1_upper_bits_extend_the_bank_index(){
        let mut cart = Cartridge::new(&make_rom(64, 0x01), None).unwrap();

        cart.write_byte(0x2000, 0x02);
        cart.write_byte(0x4000, 0x01);
        assert_eq!(cart.read_rom_high(0x4000), 34);
    }

    #[test]
    fn test_mbc1_ram_enable_latch() {
        let mut cart = Cartridge::new(&make_rom(8, 0x01), None).unwrap();

        cart.write_byte(0xA000, 0x42);
        assert_eq!(cart.read_external_ram(0xA000), INVALID_READ);

        cart.write_byte(0x0000, 0x0A);
        cart.write_byte(0xA000, 0x42);
        assert_eq!(cart.read_external_ram(0xA000), 0x42);

        cart.write_byte(0x0000, 0x00);
        assert_eq!(cart.read_external_ram(0xA000), INVALID_READ);
    }

    #[test]
    fn test_mbc1_ram_banking_mode() {
        let mut cart = Cartridge::new(&make_rom(8, 0x01), None).unwrap();
        cart.write_byte(0x0000, 0x0A);

        cart.write_byte(0xA000, 0x11);
        // Switch to advanced banking and select RAM bank 1.
        cart.write_byte(0x6000, 0x01);
        cart.write_byte(0x4000, 0x01);
        cart.write_byte(0xA000, 0x22);

        assert_eq!(cart.read_external_ram(0xA000), 0x22);
        cart.write_byte(0x6000, 0x00);
        assert_eq!(cart.read_external_ram(0xA000), 0x11);
    }

    #[test]
    fn test_padded_dword_read_at_final_byte() {
        let mut rom = make_rom(2, 0x00);
        let last = rom.len() - 1;
        rom[last] = 0xAB;
        let cart = Cartridge::new(&rom, None).unwrap();

        assert_eq!(cart.read_dword(0x7FFF), 0x0000_00AB);
    }
}
