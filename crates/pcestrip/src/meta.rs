//! GD3 metadata reader, used only for the conversion report.
//!
//! The GD3 chunk trails the command data: a `"Gd3 "` ident, a 32-bit
//! little-endian version, a 32-bit little-endian length, then UTF-16LE
//! nul-terminated strings. Only the name fields are kept (track, game,
//! system and author, English and Japanese each); release date, ripper and
//! notes are not displayed anywhere, so the parser stops before them.
//!
//! Metadata never gates conversion. Callers treat any parse failure as
//! "no metadata" and move on.
use crate::binutil::{ParseError, read_slice, read_u16_le_at, read_u32_le_at};

/// Display names parsed from a GD3 chunk. Empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gd3 {
    pub track_name_en: Option<String>,
    pub track_name_jp: Option<String>,
    pub game_name_en: Option<String>,
    pub game_name_jp: Option<String>,
    pub system_name_en: Option<String>,
    pub system_name_jp: Option<String>,
    pub author_name_en: Option<String>,
    pub author_name_jp: Option<String>,
}

/// Number of leading string fields kept from the chunk.
const GD3_NAME_FIELDS: usize = 8;

/// Parse a GD3 chunk starting at offset 0 of `bytes`.
///
/// Returns a populated `Gd3` or a `ParseError` when the fixed-size part of
/// the chunk is damaged. String-level damage degrades instead of failing: a
/// chunk ending mid-field leaves that field and the rest `None`, and a field
/// that is not valid UTF-16 becomes `None` on its own.
pub(crate) fn parse_gd3(bytes: &[u8]) -> Result<Gd3, ParseError> {
    // need at least 12 bytes: ident(4) + version(4) + length(4)
    if bytes.len() < 12 {
        return Err(ParseError::HeaderTooShort("Gd3 header".into()));
    }

    let ident = read_slice(bytes, 0, 4)?;
    if ident != b"Gd3 " {
        let mut id: [u8; 4] = [0; 4];
        id.copy_from_slice(ident);
        return Err(ParseError::InvalidIdent(id));
    }

    let data_len = read_u32_le_at(bytes, 8)? as usize;
    let data_off = 0x0C_usize;
    let data = read_slice(bytes, data_off, data_len.min(bytes.len() - data_off))?;

    let mut fields: Vec<Option<String>> = Vec::with_capacity(GD3_NAME_FIELDS);
    let mut i = 0_usize;
    'fields: for _ in 0..GD3_NAME_FIELDS {
        let mut codes: Vec<u16> = Vec::new();
        loop {
            if i + 1 >= data.len() {
                // Ran out mid-field; this and the remaining fields stay empty.
                while fields.len() < GD3_NAME_FIELDS {
                    fields.push(None);
                }
                break 'fields;
            }
            let code = read_u16_le_at(data, i)?;
            i += 2;
            if code == 0 {
                break;
            }
            codes.push(code);
        }

        if codes.is_empty() {
            fields.push(None);
        } else {
            fields.push(String::from_utf16(&codes).ok());
        }
    }

    Ok(Gd3 {
        track_name_en: fields[0].clone(),
        track_name_jp: fields[1].clone(),
        game_name_en: fields[2].clone(),
        game_name_jp: fields[3].clone(),
        system_name_en: fields[4].clone(),
        system_name_jp: fields[5].clone(),
        author_name_en: fields[6].clone(),
        author_name_jp: fields[7].clone(),
    })
}

impl std::convert::TryFrom<&[u8]> for Gd3 {
    type Error = ParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        parse_gd3(bytes)
    }
}
