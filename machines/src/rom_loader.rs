//! Program file loading.
//!
//! A CHIP-8 program is a flat binary copied into RAM at the program entry
//! point. The only validation possible is that it fits. A CRC-32 of the
//! image is reported alongside it so a program can be identified in logs.

use std::path::Path;

use chipbox_core::core::LoadError;

// ---------------------------------------------------------------------------
// Checksum
// ---------------------------------------------------------------------------

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < table.len() {
        let mut c = n as u32;
        let mut bit = 0;
        while bit < 8 {
            let mask = (c & 1).wrapping_neg();
            c = (c >> 1) ^ (0xEDB8_8320 & mask);
            bit += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = crc_table();

/// IEEE CRC-32, as printed by `crc32(1)` and zip tools.
fn crc32(data: &[u8]) -> u32 {
    !data.iter().fold(!0u32, |c, &b| {
        CRC_TABLE[((c ^ u32::from(b)) & 0xFF) as usize] ^ (c >> 8)
    })
}

// ---------------------------------------------------------------------------
// ProgramImage
// ---------------------------------------------------------------------------

/// A program validated to fit in program memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramImage {
    data: Vec<u8>,
    crc32: u32,
}

impl ProgramImage {
    /// Read a program file, rejecting it if it exceeds `capacity` bytes.
    pub fn from_file(path: &Path, capacity: usize) -> Result<Self, LoadError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data, capacity)
    }

    pub fn from_bytes(data: Vec<u8>, capacity: usize) -> Result<Self, LoadError> {
        if data.len() > capacity {
            return Err(LoadError::TooLarge {
                size: data.len(),
                capacity,
            });
        }
        let crc32 = crc32(&data);
        Ok(Self { data, crc32 })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn crc32(&self) -> u32 {
        self.crc32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_reference_values() {
        assert_eq!(crc32(&[]), 0);
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b"a"), 0xE8B7_BE43);
    }

    #[test]
    fn accepts_program_that_exactly_fits() {
        let image = ProgramImage::from_bytes(vec![0xAB; 16], 16).unwrap();
        assert_eq!(image.len(), 16);
        assert_eq!(image.crc32(), crc32(&[0xAB; 16]));
    }

    #[test]
    fn rejects_oversized_program() {
        let result = ProgramImage::from_bytes(vec![0; 17], 16);
        assert!(matches!(
            result,
            Err(LoadError::TooLarge {
                size: 17,
                capacity: 16
            })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("chipbox_rom_loader_missing.ch8");
        let _ = std::fs::remove_file(&path);
        let result = ProgramImage::from_file(&path, 16);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn from_file_reads_contents() {
        let path = std::env::temp_dir().join("chipbox_rom_loader_test.ch8");
        std::fs::write(&path, [0x00, 0xE0, 0x12, 0x02]).unwrap();

        let image = ProgramImage::from_file(&path, 3584).unwrap();
        assert_eq!(image.data(), &[0x00, 0xE0, 0x12, 0x02]);

        std::fs::remove_file(&path).unwrap();
    }
}
