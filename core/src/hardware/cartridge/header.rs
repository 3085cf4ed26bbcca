//! Parsing of the cartridge header at 0x0100..0x014F.

pub const HEADER_START: u16 = 0x0100;
pub const HEADER_END: u16 = 0x014F;

#[derive(Debug, Default)]
pub struct CartridgeHeader {
    /// Upper case ASCII, up to 16 characters, zero padded.
    pub title: String,
    /// Set when the cartridge advertises CGB functions. Only the register
    /// layout placeholders exist for those, no colour behaviour.
    pub cgb_flag: bool,
    /// Two character ASCII code used by newer games; older games use
    /// `old_licensee_code` instead.
    pub new_licensee_code: u16,
    /// Whether the game supports SGB functions.
    pub sgb_flag: bool,
    /// Which memory bank controller (if any) the cartridge carries.
    pub cartridge_type: u8,
    /// Encoded ROM size: the actual size is 32 KiB << value.
    pub rom_size: u8,
    /// Encoded external RAM size.
    pub ram_size: u8,
    /// Destination code, `true` for the Japanese market.
    pub is_japanese: bool,
    pub old_licensee_code: u8,
    pub mask_rom_version: u8,
    /// Checksum over header bytes 0x0134..0x014C. Parsed, not verified.
    pub header_checksum: u8,
    /// Checksum over the entire ROM. Parsed, not verified.
    pub global_checksum: u16,
}

impl CartridgeHeader {
    pub fn new(rom: &[u8]) -> Self {
        let cgb_flag = read_cgb_flag(rom);
        CartridgeHeader {
            title: read_title(rom, cgb_flag),
            cgb_flag,
            new_licensee_code: ((rom[0x144] as u16) << 8) | rom[0x145] as u16,
            sgb_flag: rom[0x146] == 0x03,
            cartridge_type: rom[0x147],
            rom_size: rom[0x148],
            ram_size: rom[0x149],
            is_japanese: rom[0x14A] == 0x00,
            old_licensee_code: rom[0x14B],
            mask_rom_version: rom[0x14C],
            header_checksum: rom[0x14D],
            global_checksum: ((rom[0x14E] as u16) << 8) | rom[0x14F] as u16,
        }
    }

    /// The ROM size in bytes the header declares.
    pub fn rom_size_bytes(&self) -> usize {
        0x8000 << self.rom_size
    }

    /// The external RAM size in bytes the header declares.
    pub fn ram_size_bytes(&self) -> usize {
        match self.ram_size {
            0x00 => 0,
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x20000,
            0x05 => 0x10000,
            value => {
                log::warn!("Unknown RAM size code {:#04X}, assuming 8 KiB", value);
                0x2000
            }
        }
    }
}

fn read_title(rom: &[u8], cgb_mode: bool) -> String {
    // The CGB reuses the upper title bytes for flags, so read pessimistically.
    let slice = if cgb_mode {
        &rom[0x134..=0x13E]
    } else {
        &rom[0x134..=0x143]
    };

    String::from_utf8_lossy(slice)
        .trim_matches(char::from(0))
        .to_owned()
}

fn read_cgb_flag(rom: &[u8]) -> bool {
    matches!(rom[0x143], 0x80 | 0xC0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_title() {
        let mut rom = vec![0u8; 0x8000];
        for (i, byte) in b"HELLO WOR".iter().enumerate() {
            rom[0x134 + i] = *byte;
        }

        let header = CartridgeHeader::new(&rom);
        assert_eq!(header.title, "HELLO WOR");
    }

    #[test]
    fn test_size_decoding() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x148] = 0x02;
        rom[0x149] = 0x03;

        let header = CartridgeHeader::new(&rom);
        assert_eq!(header.rom_size_bytes(), 0x20000);
        assert_eq!(header.ram_size_bytes(), 0x8000);
    }
}
