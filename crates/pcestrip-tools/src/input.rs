//! Input loading, with transparent gzip handling.
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::Context;
use flate2::read::GzDecoder;

/// Read a VGM file into memory.
///
/// Gzip-compressed input is detected by extension (`.vgz`/`.gz`) or by the
/// gzip magic bytes (0x1F 0x8B) and decompressed transparently.
pub fn read_vgm_as_vec(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data =
        fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;

    let is_gzip = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("vgz") || s.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
        || (data.len() >= 2 && data[0] == 0x1F && data[1] == 0x8B);

    if is_gzip {
        let mut decoder = GzDecoder::new(Cursor::new(data));
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .with_context(|| format!("gzip decompression failed: {}", path.display()))?;
        Ok(out)
    } else {
        Ok(data)
    }
}
