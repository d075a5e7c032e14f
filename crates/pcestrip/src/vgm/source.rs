//! Sequential, bounds-checked cursor over a VGM command data region.
use crate::binutil::{ParseError, read_slice};
use crate::meta::{Gd3, parse_gd3};
use crate::vgm::header::{VgmHeader, parse_header};

/// A parsed VGM file reduced to what conversion needs: the validated header,
/// the command data region as an owned buffer, and a read cursor.
///
/// All reads are bounded by the declared data region, not by file EOF, so a
/// truncated declaration surfaces as a read failure instead of running into
/// trailing metadata.
#[derive(Debug, Clone)]
pub struct VgmSource {
    header: VgmHeader,
    gd3: Option<Gd3>,
    data: Vec<u8>,
    pos: usize,
}

impl VgmSource {
    /// Parse a whole VGM image and capture its command data region.
    ///
    /// The GD3 chunk, when present and well formed, is parsed for reporting;
    /// a damaged chunk degrades to no metadata rather than failing the file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let header = parse_header(bytes)?;
        let start = header.data_start();
        let end = header.data_end(bytes.len());
        let len = end.checked_sub(start).ok_or_else(|| ParseError::OffsetOutOfRange {
            offset: start,
            needed: 1,
            available: end,
            context: Some("data_offset".into()),
        })?;
        let data = read_slice(bytes, start, len)?.to_vec();

        let gd3 = header
            .gd3_start()
            .filter(|&off| off < bytes.len())
            .and_then(|off| parse_gd3(&bytes[off..]).ok());

        Ok(VgmSource {
            header,
            gd3,
            data,
            pos: 0,
        })
    }

    /// Read one byte and advance, or fail at the region end.
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Read a little-endian u16 and advance, or fail at the region end.
    pub fn read_u16_le(&mut self) -> Option<u16> {
        if self.pos + 2 > self.data.len() {
            return None;
        }
        let mut tmp: [u8; 2] = [0; 2];
        tmp.copy_from_slice(&self.data[self.pos..self.pos + 2]);
        self.pos += 2;
        Some(u16::from_le_bytes(tmp))
    }

    /// Advance the cursor by `n` bytes, or fail if that passes the region end.
    pub fn skip(&mut self, n: usize) -> Option<()> {
        let end = self.pos.checked_add(n)?;
        if end > self.data.len() {
            return None;
        }
        self.pos = end;
        Some(())
    }

    /// Current cursor position, relative to the data region start.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once the cursor has consumed the whole region.
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move the cursor back to the region start.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Declared loop entry point, relative to the data region start.
    ///
    /// `None` when the header declares no loop or the declared point falls
    /// outside the region.
    pub fn loop_position(&self) -> Option<usize> {
        self.header
            .relative_loop_offset()
            .filter(|&off| off < self.data.len())
    }

    /// The validated header the region was sliced from.
    pub fn header(&self) -> &VgmHeader {
        &self.header
    }

    /// GD3 metadata, when the file carried a readable chunk.
    pub fn gd3(&self) -> Option<&Gd3> {
        self.gd3.as_ref()
    }

    /// Length of the data region in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the data region is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
