//! Utilities used by the parsers: parse error type and byte readers.
use std::fmt;

/// Error type returned by the header and metadata parsers.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An attempted read was outside the available buffer range.
    ///
    /// - `offset` is the index that was attempted to be accessed.
    /// - `needed` is the number of bytes required for the operation.
    /// - `available` is the current buffer length.
    /// - `context` is an optional string describing the logical location
    ///   (for example `"data_offset"` or `"gd3_start"`) where the access
    ///   was attempted.
    OffsetOutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
        context: Option<String>,
    },

    /// A four-byte identifier (typically ASCII) did not match an expected value.
    ///
    /// The contained array is the raw 4 bytes that were read.
    InvalidIdent([u8; 4]),

    /// The file declares a version older than the first one that carries a
    /// HuC6280 clock field (1.61).
    ///
    /// The contained `u32` is the raw BCD version number.
    UnsupportedVersion(u32),

    /// A header was shorter than the minimum required length.
    ///
    /// The contained `String` identifies which header was too short
    /// (for example: "VGM header" or "Gd3 header").
    HeaderTooShort(String),

    /// The header declares no HuC6280 clock, so the log targets some other
    /// chip and cannot be converted.
    MissingHuc6280Clock,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::OffsetOutOfRange {
                offset,
                needed,
                available,
                context,
            } => {
                if let Some(ctx) = context {
                    write!(
                        f,
                        "offset out of range at {}: 0x{:X} (needed {} bytes, available {})",
                        ctx, offset, needed, available
                    )
                } else {
                    write!(
                        f,
                        "offset out of range: 0x{:X} (needed {} bytes, available {})",
                        offset, needed, available
                    )
                }
            }
            ParseError::InvalidIdent(id) => write!(f, "invalid ident: {:?}", id),
            ParseError::UnsupportedVersion(v) => {
                write!(f, "unsupported VGM version: 0x{:X} (need >= 1.61)", v)
            }
            ParseError::HeaderTooShort(name) => write!(f, "header too short: {}", name),
            ParseError::MissingHuc6280Clock => {
                write!(f, "no HuC6280 clock declared (not a PC Engine log)")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Read a 32-bit little-endian unsigned integer from `bytes` at `off`.
///
/// Returns `Ok(u32)` when the four bytes starting at `off` are available.
/// Returns `Err(ParseError::OffsetOutOfRange)` when the buffer is too short.
pub fn read_u32_le_at(bytes: &[u8], off: usize) -> Result<u32, ParseError> {
    if bytes.len() < off + 4 {
        return Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed: 4,
            available: bytes.len(),
            context: None,
        });
    }
    let mut tmp: [u8; 4] = [0; 4];
    tmp.copy_from_slice(&bytes[off..off + 4]);
    Ok(u32::from_le_bytes(tmp))
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
///
/// Returns `Ok(u16)` when the two bytes starting at `off` are available.
/// Returns `Err(ParseError::OffsetOutOfRange)` when the buffer is too short.
pub fn read_u16_le_at(bytes: &[u8], off: usize) -> Result<u16, ParseError> {
    if bytes.len() < off + 2 {
        return Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed: 2,
            available: bytes.len(),
            context: None,
        });
    }
    let mut tmp: [u8; 2] = [0; 2];
    tmp.copy_from_slice(&bytes[off..off + 2]);
    Ok(u16::from_le_bytes(tmp))
}

/// Read a single byte from `bytes` at `off`.
///
/// Returns `Ok(u8)` when `off` is a valid index into `bytes`. Returns
/// `Err(ParseError::OffsetOutOfRange)` when `off` is out of bounds.
pub fn read_u8_at(bytes: &[u8], off: usize) -> Result<u8, ParseError> {
    if bytes.len() <= off {
        return Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed: 1,
            available: bytes.len(),
            context: None,
        });
    }
    Ok(bytes[off])
}

/// Return a borrowed slice of length `len` starting at `off` from `bytes`.
///
/// Returns `Ok(&[u8])` that borrows from the input slice when the requested
/// range is within bounds. Returns `Err(ParseError::OffsetOutOfRange)` when
/// the requested range exceeds the available buffer.
pub fn read_slice(bytes: &[u8], off: usize, len: usize) -> Result<&[u8], ParseError> {
    if bytes.len() < off + len {
        return Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed: len,
            // Report the remaining number of bytes from `off` to the end of the buffer.
            available: bytes.len().saturating_sub(off),
            context: Some("read_slice".into()),
        });
    }
    Ok(&bytes[off..off + len])
}
