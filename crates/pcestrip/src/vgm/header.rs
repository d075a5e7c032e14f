//! VGM header parsing, limited to the fields this converter needs.
//!
//! The header layout follows the VGM 1.61 specification: a `"Vgm "` ident,
//! a BCD version, a set of absolute-offset fields stored relative to their
//! own header position, and per-chip clock fields. Only logs that declare a
//! HuC6280 clock can be converted, so everything else (the forty-odd other
//! chip clocks) is ignored rather than parsed.
use crate::binutil::{ParseError, read_slice, read_u8_at, read_u32_le_at};

/// The four-byte ident every VGM file starts with.
pub const VGM_IDENT: [u8; 4] = *b"Vgm ";

/// Oldest header revision that carries the HuC6280 clock field.
pub const MIN_VERSION: u32 = 0x161;

// Field offsets into the header. Offset-valued fields store their target
// relative to their own position.
const OFS_EOF_OFFSET: usize = 0x04;
const OFS_VERSION: usize = 0x08;
const OFS_GD3_OFFSET: usize = 0x14;
const OFS_TOTAL_SAMPLES: usize = 0x18;
const OFS_LOOP_OFFSET: usize = 0x1C;
const OFS_LOOP_SAMPLES: usize = 0x20;
const OFS_DATA_OFFSET: usize = 0x34;
const OFS_VOLUME_MODIFIER: usize = 0x7C;
const OFS_LOOP_BASE: usize = 0x7E;
const OFS_LOOP_MODIFIER: usize = 0x7F;
const OFS_HUC6280_CLOCK: usize = 0xA4;

// Everything through the HuC6280 clock must be present.
const HEADER_LEN: usize = 0xA8;

/// Parsed VGM header fields, with offsets kept in their stored
/// (self-relative) form. Use the accessor methods for absolute positions.
#[derive(Debug, Clone, PartialEq)]
pub struct VgmHeader {
    pub eof_offset: u32,
    pub version: u32,
    pub gd3_offset: u32,
    pub total_samples: u32,
    pub loop_offset: u32,
    pub loop_samples: u32,
    pub data_offset: u32,
    pub volume_modifier: u8,
    pub loop_base: u8,
    pub loop_modifier: u8,
    pub huc6280_clock: u32,
}

impl VgmHeader {
    /// Absolute file offset of the first command byte.
    pub fn data_start(&self) -> usize {
        OFS_DATA_OFFSET + self.data_offset as usize
    }

    /// Absolute file offset of the GD3 chunk, when one is declared.
    pub fn gd3_start(&self) -> Option<usize> {
        if self.gd3_offset == 0 {
            None
        } else {
            Some(OFS_GD3_OFFSET + self.gd3_offset as usize)
        }
    }

    /// Absolute file offset one past the last command byte.
    ///
    /// The GD3 chunk immediately follows the command data when present;
    /// otherwise the declared EOF bounds the region. Either bound is clamped
    /// to the actual buffer length, and a file that declares neither is read
    /// to its end.
    pub fn data_end(&self, file_len: usize) -> usize {
        let declared = match self.gd3_start() {
            Some(gd3) => gd3,
            None if self.eof_offset != 0 => OFS_EOF_OFFSET + self.eof_offset as usize,
            None => file_len,
        };
        declared.min(file_len)
    }

    /// Loop entry point as an offset into the command data region, when the
    /// header declares one.
    pub fn relative_loop_offset(&self) -> Option<usize> {
        if self.loop_offset == 0 {
            return None;
        }
        let absolute = OFS_LOOP_OFFSET + self.loop_offset as usize;
        absolute.checked_sub(self.data_start())
    }
}

/// Parse and validate a VGM header from the start of `bytes`.
///
/// Validation order: ident, version (>= 1.61), HuC6280 clock (non-zero).
/// A log without a HuC6280 clock targets some other sound chip and is
/// rejected as not convertible rather than silently producing empty tracks.
pub(crate) fn parse_header(bytes: &[u8]) -> Result<VgmHeader, ParseError> {
    if bytes.len() < HEADER_LEN {
        return Err(ParseError::HeaderTooShort("VGM header".into()));
    }

    let ident = read_slice(bytes, 0, 4)?;
    if ident != VGM_IDENT {
        let mut id: [u8; 4] = [0; 4];
        id.copy_from_slice(ident);
        return Err(ParseError::InvalidIdent(id));
    }

    let version = read_u32_le_at(bytes, OFS_VERSION)?;
    if version < MIN_VERSION {
        return Err(ParseError::UnsupportedVersion(version));
    }

    let header = VgmHeader {
        eof_offset: read_u32_le_at(bytes, OFS_EOF_OFFSET)?,
        version,
        gd3_offset: read_u32_le_at(bytes, OFS_GD3_OFFSET)?,
        total_samples: read_u32_le_at(bytes, OFS_TOTAL_SAMPLES)?,
        loop_offset: read_u32_le_at(bytes, OFS_LOOP_OFFSET)?,
        loop_samples: read_u32_le_at(bytes, OFS_LOOP_SAMPLES)?,
        data_offset: read_u32_le_at(bytes, OFS_DATA_OFFSET)?,
        volume_modifier: read_u8_at(bytes, OFS_VOLUME_MODIFIER)?,
        loop_base: read_u8_at(bytes, OFS_LOOP_BASE)?,
        loop_modifier: read_u8_at(bytes, OFS_LOOP_MODIFIER)?,
        huc6280_clock: read_u32_le_at(bytes, OFS_HUC6280_CLOCK)?,
    };

    if header.huc6280_clock == 0 {
        return Err(ParseError::MissingHuc6280Clock);
    }

    Ok(header)
}

impl std::convert::TryFrom<&[u8]> for VgmHeader {
    type Error = ParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        parse_header(bytes)
    }
}
