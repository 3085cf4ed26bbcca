//! Tile decoding. A tile is 8x8 pixels of 2 bits each, stored as 16 bytes:
//! byte `2n` holds the low bit plane of row `n` and byte `2n + 1` the high
//! plane, with bit 7 as the leftmost pixel.
//!
//! The background and window can address tile data either unsigned from
//! 0x8000 or signed from 0x9000 (LCDC bit 4); sprites always use the
//! unsigned mode.

pub const TILE_DIM: usize = 8;
pub const TILE_BYTES: usize = 16;

/// Tilemap base offsets within VRAM.
pub const TILEMAP_9800_OFFSET: usize = 0x1800;
pub const TILEMAP_9C00_OFFSET: usize = 0x1C00;
/// Signed tile indices are based at 0x9000.
pub const SIGNED_TILE_DATA_OFFSET: usize = 0x1000;

/// Decode a full 16-byte tile into 2-bit palette indices, one byte per
/// pixel, writing each row at a stride of `row_pitch`.
pub fn render_tile(tile: &[u8], dst: &mut [u8], row_pitch: usize) {
    debug_assert!(tile.len() >= TILE_BYTES);

    for y in 0..TILE_DIM {
        let row = decode_tile_row(tile[y * 2], tile[y * 2 + 1]);
        dst[y * row_pitch..y * row_pitch + TILE_DIM].copy_from_slice(&row);
    }
}

/// Decode one row from its two bit planes, leftmost pixel first.
pub fn decode_tile_row(low: u8, high: u8) -> [u8; TILE_DIM] {
    let mut row = [0; TILE_DIM];
    for (x, pixel) in row.iter_mut().enumerate() {
        let mask = 0x80 >> x;
        *pixel = (u8::from(high & mask != 0) << 1) | u8::from(low & mask != 0);
    }
    row
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_tile_reference_glyph() {
        // A capital "A" glyph.
        let tile = [
            0x3C, 0x7E, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x7E, 0x5E, 0x7E, 0x0A, 0x7C, 0x56,
            0x38, 0x7C,
        ];
        #[rustfmt::skip]
        let expected: [u8; 64] = [
            0b00, 0b10, 0b11, 0b11, 0b11, 0b11, 0b10, 0b00,
            0b00, 0b11, 0b00, 0b00, 0b00, 0b00, 0b11, 0b00,
            0b00, 0b11, 0b00, 0b00, 0b00, 0b00, 0b11, 0b00,
            0b00, 0b11, 0b00, 0b00, 0b00, 0b00, 0b11, 0b00,
            0b00, 0b11, 0b01, 0b11, 0b11, 0b11, 0b11, 0b00,
            0b00, 0b01, 0b01, 0b01, 0b11, 0b01, 0b11, 0b00,
            0b00, 0b11, 0b01, 0b11, 0b01, 0b11, 0b10, 0b00,
            0b00, 0b10, 0b11, 0b11, 0b11, 0b10, 0b00, 0b00,
        ];

        let mut output = [0u8; 64];
        render_tile(&tile, &mut output, TILE_DIM);

        assert_eq!(output, expected);
    }

    #[test]
    fn test_decode_row_bit_order() {
        // Low plane 0x80: leftmost pixel only; high plane 0x01: rightmost.
        let row = decode_tile_row(0x80, 0x01);

        assert_eq!(row[0], 0b01);
        assert_eq!(row[7], 0b10);
        assert_eq!(&row[1..7], &[0; 6]);
    }
}
